use contactbook_core::db::open_db_in_memory;
use contactbook_core::validation::{EMAIL_INVALID, PHONE_INVALID};
use contactbook_core::{
    ContactInput, ContactService, ContactServiceError, Field, PageRequest,
    SqliteContactRepository,
};
use rusqlite::Connection;

fn row_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM contacts;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn add_then_list_returns_contact_on_top() {
    let conn = open_db_in_memory().unwrap();
    let service = ContactService::new(SqliteContactRepository::new(&conn));

    let created = service
        .add_contact(ContactInput::new("A", "a@b.com", "1234567890"))
        .unwrap();
    let page = service
        .list_contacts(PageRequest::new(1, 10).unwrap())
        .unwrap();

    assert_eq!(page.contacts.len(), 1);
    assert_eq!(page.contacts[0], created);
    assert_eq!(page.total, 1);
    assert_eq!(page.total_pages, 1);
}

#[test]
fn add_stores_normalized_values() {
    let conn = open_db_in_memory().unwrap();
    let service = ContactService::new(SqliteContactRepository::new(&conn));

    let created = service
        .add_contact(ContactInput::new("  Ada Lovelace ", " ada@example.com", "(555) 123-4567"))
        .unwrap();

    assert_eq!(created.name, "Ada Lovelace");
    assert_eq!(created.email, "ada@example.com");
    assert_eq!(created.phone, "5551234567");
}

#[test]
fn invalid_input_never_reaches_storage() {
    let conn = open_db_in_memory().unwrap();
    let service = ContactService::new(SqliteContactRepository::new(&conn));

    let cases = [
        (ContactInput::new("A", "a@b.com", "12345"), Field::Phone, PHONE_INVALID),
        (ContactInput::new("A", "a@b.com", "12345678901"), Field::Phone, PHONE_INVALID),
        (ContactInput::new("A", "not-an-email", "1234567890"), Field::Email, EMAIL_INVALID),
    ];

    for (input, field, message) in cases {
        let err = service.add_contact(input).unwrap_err();
        match err {
            ContactServiceError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors.get(field), Some(message));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(row_count(&conn), 0);
}

#[test]
fn duplicate_email_maps_to_service_error() {
    let conn = open_db_in_memory().unwrap();
    let service = ContactService::new(SqliteContactRepository::new(&conn));
    service
        .add_contact(ContactInput::new("A", "a@b.com", "1234567890"))
        .unwrap();

    let err = service
        .add_contact(ContactInput::new("B", "a@b.com", "0987654321"))
        .unwrap_err();
    assert!(matches!(err, ContactServiceError::DuplicateEmail(ref email) if email == "a@b.com"));
    assert_eq!(row_count(&conn), 1);
}

#[test]
fn delete_missing_contact_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = ContactService::new(SqliteContactRepository::new(&conn));
    service
        .add_contact(ContactInput::new("A", "a@b.com", "1234567890"))
        .unwrap();

    let err = service.delete_contact(999).unwrap_err();
    assert!(matches!(err, ContactServiceError::NotFound(999)));
    assert_eq!(row_count(&conn), 1);
}

#[test]
fn delete_rejects_non_positive_ids() {
    let conn = open_db_in_memory().unwrap();
    let service = ContactService::new(SqliteContactRepository::new(&conn));

    assert!(matches!(
        service.delete_contact(0).unwrap_err(),
        ContactServiceError::InvalidId(0)
    ));
    assert!(matches!(
        service.delete_contact(-3).unwrap_err(),
        ContactServiceError::InvalidId(-3)
    ));
}

#[test]
fn delete_existing_contact_removes_row() {
    let conn = open_db_in_memory().unwrap();
    let service = ContactService::new(SqliteContactRepository::new(&conn));
    let created = service
        .add_contact(ContactInput::new("A", "a@b.com", "1234567890"))
        .unwrap();

    service.delete_contact(created.id).unwrap();
    assert!(service.get_contact(created.id).unwrap().is_none());
    assert_eq!(row_count(&conn), 0);
}
