//! Person and company services against the in-memory repositories.

mod mocks;

use mocks::{MockRecordRepository, MockSchemaRepository};
use serde_json::{json, Value};
use std::sync::Arc;
use twenty_sync::models::{CompanyFields, EntityKind, PersonFields};
use twenty_sync::services::{
    Backend, CompanySearchBy, CompanyService, CompanyServiceImpl, KeyParams, ListByCompanyParams,
    PersonService, PersonServiceImpl, SyncAction, UpdateParams,
};

const JANE_ID: &str = "11111111-1111-4111-8111-111111111111";
const JOHN_ID: &str = "22222222-2222-4222-8222-222222222222";
const ACME_ID: &str = "33333333-3333-4333-8333-333333333333";
const ACME_CORP_ID: &str = "44444444-4444-4444-8444-444444444444";
const OWNER_ID: &str = "55555555-5555-4555-8555-555555555555";

fn backend(repo: &MockRecordRepository, schema: MockSchemaRepository) -> Backend {
    Backend::new(Arc::new(repo.clone()), Arc::new(schema), 50, 100)
}

fn seeded() -> MockRecordRepository {
    let repo = MockRecordRepository::new();
    repo.add(
        EntityKind::Company,
        json!({
            "id": ACME_ID,
            "name": "Acme",
            "domainName": {"primaryLinkUrl": "https://acme.com"}
        }),
    );
    repo.add(
        EntityKind::Company,
        json!({
            "id": ACME_CORP_ID,
            "name": "Acme Corp",
            "domainName": {"primaryLinkUrl": "https://acmecorp.io"}
        }),
    );
    repo.add(
        EntityKind::Person,
        json!({
            "id": JANE_ID,
            "name": {"firstName": "Jane", "lastName": "Doe"},
            "emails": {"primaryEmail": "jane@example.com"},
            "phones": {"primaryPhoneNumber": "5550100"},
            "city": "Paris",
            "companyId": ACME_ID
        }),
    );
    repo.add(
        EntityKind::Person,
        json!({
            "id": JOHN_ID,
            "name": {"firstName": "John", "lastName": "Doe"},
            "emails": {"primaryEmail": "john@example.com"},
            "city": "Berlin"
        }),
    );
    repo
}

fn key(search_by: &str, value: &str) -> KeyParams {
    KeyParams {
        search_by: search_by.into(),
        search_value: value.into(),
        ..Default::default()
    }
}

fn person_service(repo: &MockRecordRepository) -> PersonServiceImpl {
    PersonServiceImpl::new(backend(repo, MockSchemaRepository::new()))
}

fn company_service(repo: &MockRecordRepository) -> CompanyServiceImpl {
    CompanyServiceImpl::new(backend(repo, MockSchemaRepository::new()))
}

// ---------------------------------------------------------------------------
// person:find
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_find_person_by_email_is_unique() {
    let repo = seeded();
    let output = person_service(&repo)
        .find(key("email", "JANE@example.com"))
        .await
        .unwrap();

    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["found"], true);
    assert_eq!(json["confidence"], 0.95);
    assert_eq!(json["recordId"], JANE_ID);
    assert_eq!(json["searchMethod"], "email");
    assert_eq!(json["searchValue"], "jane@example.com");
    assert_eq!(json["person"]["city"], "Paris");
    assert_eq!(json["message"], "Person found: Jane Doe");
}

#[tokio::test]
async fn test_find_person_by_shared_last_name_is_ambiguous() {
    let repo = seeded();
    let output = person_service(&repo).find(key("name", "doe")).await.unwrap();

    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["found"], true);
    assert_eq!(json["confidence"], 0.8);
    assert_eq!(json["totalMatches"], 2);
    assert_eq!(json["recordId"], JANE_ID);
}

#[tokio::test]
async fn test_find_person_miss() {
    let repo = seeded();
    let output = person_service(&repo)
        .find(key("email", "nobody@example.com"))
        .await
        .unwrap();

    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["found"], false);
    assert_eq!(json["person"], Value::Null);
    assert_eq!(json["confidence"], 0.0);
    assert_eq!(
        json["message"],
        "No person found with email: nobody@example.com"
    );
}

#[tokio::test]
async fn test_find_rejects_unsupported_method_before_searching() {
    let repo = seeded();
    let err = person_service(&repo)
        .find(key("domain", "acme.com"))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(repo.get_call_count("find"), 0);
}

#[tokio::test]
async fn test_find_by_custom_field_resolves_link_suffix() {
    let repo = seeded();
    repo.add(
        EntityKind::Person,
        json!({
            "id": "66666666-6666-4666-8666-666666666666",
            "name": {"firstName": "Ig", "lastName": "User"},
            "instagramLink": {"primaryLinkUrl": "https://instagram.com/iguser"}
        }),
    );
    let schema = MockSchemaRepository::new().with_fields("Person", &["id", "instagramLink"]);
    let service = PersonServiceImpl::new(backend(&repo, schema));

    let output = service
        .find(KeyParams {
            search_by: "customField".into(),
            search_value: "https://instagram.com/iguser".into(),
            custom_field_path: Some("instagram".into()),
            include_related: Some(false),
        })
        .await
        .unwrap();

    assert!(output.found);
    assert_eq!(
        output.record_id.as_deref(),
        Some("66666666-6666-4666-8666-666666666666")
    );
    assert!(!repo.last_query().unwrap().include_related);
}

#[tokio::test]
async fn test_find_by_unknown_custom_field_lists_candidates() {
    let repo = seeded();
    let schema = MockSchemaRepository::new().with_fields("Person", &["id", "city"]);
    let service = PersonServiceImpl::new(backend(&repo, schema));

    let err = service
        .find(KeyParams {
            search_by: "customField".into(),
            search_value: "x".into(),
            custom_field_path: Some("instagram".into()),
            include_related: None,
        })
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("instagram"));
    assert!(message.contains("instagramLink"));
}

// ---------------------------------------------------------------------------
// person:create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_person_then_create_again_is_idempotent() {
    let repo = seeded();
    let service = person_service(&repo);
    let fields = PersonFields {
        first_name: Some("Ada".into()),
        last_name: Some("Lovelace".into()),
        email: Some("ada@example.com".into()),
        ..Default::default()
    };

    let first = serde_json::to_value(service.create(fields.clone()).await.unwrap()).unwrap();
    assert_eq!(first["created"], true);
    assert_eq!(first["action"], "created");
    assert_eq!(first["confidence"], 1.0);
    assert_eq!(first["message"], "Person created: Ada Lovelace");

    let second = serde_json::to_value(service.create(fields).await.unwrap()).unwrap();
    assert_eq!(second["created"], false);
    assert_eq!(second["action"], "found");
    assert_eq!(second["foundBy"], "email");
    assert_eq!(second["recordId"], first["recordId"]);
    assert_eq!(repo.count(EntityKind::Person), 3);
    assert_eq!(repo.get_call_count("create"), 1);
}

#[tokio::test]
async fn test_create_person_failure_surfaces_without_retry() {
    let repo = seeded();
    repo.fail_creates(EntityKind::Person);

    let result = person_service(&repo)
        .create(PersonFields {
            first_name: Some("Ada".into()),
            email: Some("ada@example.com".into()),
            ..Default::default()
        })
        .await;

    assert!(result.is_err());
    assert_eq!(repo.get_call_count("create"), 1);
    assert_eq!(repo.count(EntityKind::Person), 2);
}

#[tokio::test]
async fn test_create_person_resolves_company_name() {
    let repo = seeded();
    let output = person_service(&repo)
        .create(PersonFields {
            first_name: Some("Grace".into()),
            company_name: Some("Acme Corp".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let created = repo
        .all(EntityKind::Person)
        .into_iter()
        .find(|p| p.id() == output.record_id.as_deref())
        .unwrap();
    assert_eq!(created.get_str("companyId"), Some(ACME_CORP_ID));
}

#[tokio::test]
async fn test_create_person_with_unknown_company_fails() {
    let repo = seeded();
    let err = person_service(&repo)
        .create(PersonFields {
            first_name: Some("Grace".into()),
            company_name: Some("Globex".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Company not found: Globex"));
    assert_eq!(repo.get_call_count("create"), 0);
}

#[tokio::test]
async fn test_create_person_requires_first_name() {
    let repo = seeded();
    let err = person_service(&repo)
        .create(PersonFields {
            email: Some("x@example.com".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

// ---------------------------------------------------------------------------
// person:update / person:delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_update_person_keeps_unchanged_nested_fields() {
    let repo = seeded();
    let output = person_service(&repo)
        .update(UpdateParams {
            key: key("email", "jane@example.com"),
            fields: PersonFields {
                city: Some("Lyon".into()),
                last_name: Some("Smith".into()),
                ..Default::default()
            },
        })
        .await
        .unwrap();

    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["updated"], true);
    assert_eq!(json["originalPerson"]["city"], "Paris");
    assert_eq!(json["person"]["city"], "Lyon");
    assert_eq!(json["person"]["name"]["firstName"], "Jane");
    assert_eq!(json["person"]["name"]["lastName"], "Smith");
    assert_eq!(json["person"]["phones"]["primaryPhoneNumber"], "5550100");
}

#[tokio::test]
async fn test_update_person_writes_custom_link_field() {
    let repo = seeded();
    let schema = MockSchemaRepository::new().with_fields("Person", &["id", "instagramLink"]);
    let service = PersonServiceImpl::new(backend(&repo, schema));

    let params: UpdateParams<PersonFields> = serde_json::from_value(json!({
        "searchBy": "id",
        "searchValue": JOHN_ID,
        "customFields": [{"fieldName": "instagram", "fieldValue": "https://instagram.com/john"}]
    }))
    .unwrap();
    let output = service.update(params).await.unwrap();

    assert!(output.updated);
    let john = repo
        .all(EntityKind::Person)
        .into_iter()
        .find(|p| p.id() == Some(JOHN_ID))
        .unwrap();
    assert_eq!(
        john.get_str("instagramLink.primaryLinkUrl"),
        Some("https://instagram.com/john")
    );
}

#[tokio::test]
async fn test_update_person_miss_is_soft() {
    let repo = seeded();
    let output = person_service(&repo)
        .update(UpdateParams {
            key: key("email", "ghost@example.com"),
            fields: PersonFields {
                city: Some("Rome".into()),
                ..Default::default()
            },
        })
        .await
        .unwrap();

    assert!(!output.updated);
    assert_eq!(output.error.as_deref(), Some("Person not found"));
    assert_eq!(repo.get_call_count("update"), 0);
}

#[tokio::test]
async fn test_delete_person_by_id() {
    let repo = seeded();
    let output = person_service(&repo).delete(key("id", JOHN_ID)).await.unwrap();

    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["deleted"], true);
    assert_eq!(json["personId"], JOHN_ID);
    assert_eq!(repo.count(EntityKind::Person), 1);
}

// ---------------------------------------------------------------------------
// person:listByCompany
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_list_people_by_company_name() {
    let repo = seeded();
    let output = person_service(&repo)
        .list_by_company(ListByCompanyParams {
            company_search_by: CompanySearchBy::Name,
            company_identifier: "acme".into(),
        })
        .await
        .unwrap();

    assert_eq!(output.company_id.as_deref(), Some(ACME_ID));
    assert_eq!(output.total_count, 1);
    assert_eq!(output.people[0].id(), Some(JANE_ID));
    assert!(output.error.is_none());
}

#[tokio::test]
async fn test_list_people_by_company_id() {
    let repo = seeded();
    let output = person_service(&repo)
        .list_by_company(ListByCompanyParams {
            company_search_by: CompanySearchBy::Id,
            company_identifier: ACME_CORP_ID.into(),
        })
        .await
        .unwrap();

    assert_eq!(output.company_id.as_deref(), Some(ACME_CORP_ID));
    assert_eq!(output.total_count, 0);
    assert_eq!(output.message, "Found 0 people in company");
}

#[tokio::test]
async fn test_list_people_by_missing_company_is_soft() {
    let repo = seeded();
    let output = person_service(&repo)
        .list_by_company(ListByCompanyParams {
            company_search_by: CompanySearchBy::Name,
            company_identifier: "Globex".into(),
        })
        .await
        .unwrap();

    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["error"], "Company not found");
    assert_eq!(json["companySearchBy"], "name");
    assert_eq!(json["people"], json!([]));
}

// ---------------------------------------------------------------------------
// person:sync
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_sync_reports_created_updated_and_unchanged() {
    let repo = seeded();
    let service = person_service(&repo);

    let created = service
        .sync(PersonFields {
            first_name: Some("Alan".into()),
            email: Some("alan@example.com".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(created.action, SyncAction::Created);
    assert!(created.changes.contains(&"emails".to_string()));

    let unchanged = service
        .sync(PersonFields {
            email: Some("jane@example.com".into()),
            city: Some("Paris".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(unchanged.action, SyncAction::NoChanges);
    assert!(unchanged.changes.is_empty());

    let updated = service
        .sync(PersonFields {
            email: Some("jane@example.com".into()),
            city: Some("Nice".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(updated.action, SyncAction::Updated);
    assert_eq!(updated.changes, vec!["city"]);
    assert_eq!(updated.person.get_str("city"), Some("Nice"));
    assert_eq!(updated.person.get_str("name.firstName"), Some("Jane"));
}

#[tokio::test]
async fn test_sync_requires_email() {
    let repo = seeded();
    let err = person_service(&repo)
        .sync(PersonFields {
            first_name: Some("Alan".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("email"));
}

// ---------------------------------------------------------------------------
// company
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_company_found_by_domain_under_other_name() {
    let repo = seeded();
    let output = company_service(&repo)
        .create(CompanyFields {
            name: Some("ACME Incorporated".into()),
            domain: Some("www.Acme.com".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["action"], "found");
    assert_eq!(json["foundBy"], "domain");
    assert_eq!(json["recordId"], ACME_ID);
    assert_eq!(json["message"], "Company already exists: ACME Incorporated");
    assert_eq!(repo.count(EntityKind::Company), 2);
}

#[tokio::test]
async fn test_create_company_found_by_exact_name() {
    let repo = seeded();
    let output = company_service(&repo)
        .create(CompanyFields {
            name: Some("acme corp".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(!output.created);
    assert_eq!(output.found_by, Some("name"));
    assert_eq!(output.record_id.as_deref(), Some(ACME_CORP_ID));
}

#[tokio::test]
async fn test_create_company_near_miss_creates() {
    let repo = seeded();
    let output = company_service(&repo)
        .create(CompanyFields {
            name: Some("Acme Labs".into()),
            domain: Some("acmelabs.dev".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(output.created);
    assert_eq!(repo.count(EntityKind::Company), 3);
    let created = repo.all(EntityKind::Company).pop().unwrap();
    assert_eq!(
        created.get_str("domainName.primaryLinkUrl"),
        Some("https://acmelabs.dev")
    );
}

#[tokio::test]
async fn test_create_company_resolves_account_owner() {
    let repo = seeded();
    repo.add(
        EntityKind::WorkspaceMember,
        json!({"id": OWNER_ID, "userEmail": "owner@example.com"}),
    );

    let output = company_service(&repo)
        .create(CompanyFields {
            name: Some("Initech".into()),
            account_owner_email: Some("Owner@Example.com".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(output.created);
    let created = repo.all(EntityKind::Company).pop().unwrap();
    assert_eq!(created.get_str("accountOwnerId"), Some(OWNER_ID));
}

#[tokio::test]
async fn test_create_company_unknown_account_owner_fails() {
    let repo = seeded();
    let err = company_service(&repo)
        .create(CompanyFields {
            name: Some("Initech".into()),
            account_owner_email: Some("nobody@example.com".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Account owner not found"));
    assert_eq!(repo.count(EntityKind::Company), 2);
}

/// Backend whose searches return at most `limit` records per page.
fn company_service_with_page(repo: &MockRecordRepository, limit: usize) -> CompanyServiceImpl {
    CompanyServiceImpl::new(Backend::new(
        Arc::new(repo.clone()),
        Arc::new(MockSchemaRepository::new()),
        limit,
        100,
    ))
}

#[tokio::test]
async fn test_create_company_name_with_wildcards_finds_existing() {
    let repo = MockRecordRepository::new();
    for (i, name) in ["50 Percent Off", "50 Days Off", "50% Off"].iter().enumerate() {
        repo.add(
            EntityKind::Company,
            json!({"id": format!("00000000-0000-4000-8000-00000000000{}", i), "name": name}),
        );
    }

    let output = company_service_with_page(&repo, 2)
        .create(CompanyFields {
            name: Some("50% Off".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(!output.created);
    assert_eq!(output.found_by, Some("name"));
    assert_eq!(
        output.record_id.as_deref(),
        Some("00000000-0000-4000-8000-000000000002")
    );
    assert_eq!(repo.count(EntityKind::Company), 3);
}

#[tokio::test]
async fn test_create_company_domain_ignores_lookalike_domains() {
    let repo = MockRecordRepository::new();
    for (i, link) in ["https://notacme.com", "https://myacme.com", "https://acme.com"]
        .iter()
        .enumerate()
    {
        repo.add(
            EntityKind::Company,
            json!({
                "id": format!("00000000-0000-4000-8000-00000000000{}", i),
                "name": format!("Company {}", i),
                "domainName": {"primaryLinkUrl": link}
            }),
        );
    }

    let output = company_service_with_page(&repo, 2)
        .create(CompanyFields {
            name: Some("Acme Inc".into()),
            domain: Some("acme.com".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(!output.created);
    assert_eq!(output.found_by, Some("domain"));
    assert_eq!(
        output.record_id.as_deref(),
        Some("00000000-0000-4000-8000-000000000002")
    );
    assert_eq!(repo.count(EntityKind::Company), 3);
}

#[tokio::test]
async fn test_create_company_failure_surfaces_without_retry() {
    let repo = seeded();
    repo.fail_creates(EntityKind::Company);

    let result = company_service(&repo)
        .create(CompanyFields {
            name: Some("Globex".into()),
            domain: Some("globex.com".into()),
            ..Default::default()
        })
        .await;

    let err = result.unwrap_err();
    assert!(!err.is_validation());
    assert!(err.to_string().contains("cannot create company"));
    assert_eq!(repo.get_call_count("create"), 1);
    assert_eq!(repo.count(EntityKind::Company), 2);
}

#[tokio::test]
async fn test_delete_company_refuses_ambiguous_match() {
    let repo = seeded();
    let output = company_service(&repo).delete(key("name", "Acme")).await.unwrap();

    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["deleted"], false);
    assert_eq!(json["confidence"], 0.8);
    assert_eq!(json["error"], "No exact match found, delete cancelled");
    assert_eq!(repo.count(EntityKind::Company), 2);
    assert_eq!(repo.get_call_count("delete"), 0);
}

#[tokio::test]
async fn test_delete_company_by_unique_domain() {
    let repo = seeded();
    let output = company_service(&repo)
        .delete(key("domain", "acmecorp.io"))
        .await
        .unwrap();

    assert!(output.deleted);
    assert_eq!(output.id.value.as_deref(), Some(ACME_CORP_ID));
    assert_eq!(repo.count(EntityKind::Company), 1);
}

#[tokio::test]
async fn test_update_company_accepts_ambiguous_match() {
    let repo = seeded();
    let output = company_service(&repo)
        .update(UpdateParams {
            key: key("name", "Acme"),
            fields: CompanyFields {
                employees: Some(42),
                ..Default::default()
            },
        })
        .await
        .unwrap();

    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["updated"], true);
    assert_eq!(json["company"]["employees"], 42);
    assert_eq!(json["company"]["name"], "Acme");
    assert_eq!(json["originalCompany"]["name"], "Acme");
}
