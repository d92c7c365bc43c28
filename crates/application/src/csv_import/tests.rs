use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use masterhub_core::{AppError, AppResult, TenantId, UserIdentity};

use super::{
    CsvDelimiter, CsvImporter, FieldCheck, INTEGRITY_FAILURE_MESSAGE, ImportMessages,
    ImportProfile, ImportResult, ImportRow, SeenKeys, parse_csv, timestamped_file_name,
    validate_row,
};

const HEADERS: &[&str] = &["Name", "Email", "Kind"];

const MESSAGES: ImportMessages = ImportMessages {
    duplicate_in_file: "duplicate in file",
    already_registered: "already registered",
    concurrent_duplicate: "created concurrently",
};

type Key = (TenantId, String, String);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Draft {
    name: String,
    email: String,
    kind: &'static str,
}

enum WriteBehaviour {
    Store,
    ConflictAfterInserting(Vec<(String, String)>),
    Fail,
}

struct FakeContactProfile {
    stored: Mutex<Vec<(TenantId, Draft)>>,
    write_behaviour: Mutex<WriteBehaviour>,
}

impl FakeContactProfile {
    fn new() -> Self {
        Self {
            stored: Mutex::new(Vec::new()),
            write_behaviour: Mutex::new(WriteBehaviour::Store),
        }
    }

    async fn seed(&self, tenant_id: TenantId, name: &str, email: &str) {
        self.stored.lock().await.push((
            tenant_id,
            Draft {
                name: name.to_owned(),
                email: email.to_owned(),
                kind: "a",
            },
        ));
    }

    async fn stored_count(&self) -> usize {
        self.stored.lock().await.len()
    }
}

#[async_trait]
impl ImportProfile for FakeContactProfile {
    type Draft = Draft;
    type Key = (String, String);

    fn headers(&self) -> &'static [&'static str] {
        HEADERS
    }

    fn error_file_prefix(&self) -> &'static str {
        "contacts_import_error"
    }

    fn messages(&self) -> ImportMessages {
        MESSAGES
    }

    fn duplicate_key(&self, row: &ImportRow) -> Option<Self::Key> {
        let name = row.get("Name").trim();
        let email = row.get("Email").trim();
        (!name.is_empty() && !email.is_empty()).then(|| (name.to_owned(), email.to_owned()))
    }

    fn check_fields(&self, row: &ImportRow) -> FieldCheck<Draft> {
        let mut label_errors = Vec::new();
        let kind = match row.get("Kind").trim() {
            "Alpha" => Some("a"),
            "Beta" => Some("b"),
            _ => {
                label_errors.push("invalid kind".to_owned());
                None
            }
        };

        let mut field_errors = Vec::new();
        let name = row.get("Name").trim();
        if name.is_empty() {
            field_errors.push("name: this field is required".to_owned());
        } else if name.chars().count() > 10 {
            field_errors.push("name: too long".to_owned());
        }
        let email = row.get("Email").trim();
        if !email.contains('@') {
            field_errors.push("email: enter a valid email address".to_owned());
        }

        match kind {
            Some(kind) if field_errors.is_empty() => FieldCheck::passed(Draft {
                name: name.to_owned(),
                email: email.to_owned(),
                kind,
            }),
            _ => FieldCheck {
                label_errors,
                field_errors,
                draft: None,
            },
        }
    }

    async fn is_registered(&self, actor: &UserIdentity, key: &Self::Key) -> AppResult<bool> {
        Ok(self.stored.lock().await.iter().any(|(tenant_id, draft)| {
            *tenant_id == actor.tenant_id() && draft.name == key.0 && draft.email == key.1
        }))
    }

    async fn create_all(&self, actor: &UserIdentity, drafts: Vec<Draft>) -> AppResult<usize> {
        let mut stored = self.stored.lock().await;
        match &*self.write_behaviour.lock().await {
            WriteBehaviour::Store => {}
            WriteBehaviour::ConflictAfterInserting(concurrent) => {
                for (name, email) in concurrent {
                    stored.push((
                        actor.tenant_id(),
                        Draft {
                            name: name.clone(),
                            email: email.clone(),
                            kind: "a",
                        },
                    ));
                }
                return Err(AppError::Conflict("duplicate key value".to_owned()));
            }
            WriteBehaviour::Fail => {
                return Err(AppError::Internal("connection reset".to_owned()));
            }
        }

        let mut keys: HashSet<Key> = stored
            .iter()
            .map(|(tenant_id, draft)| (*tenant_id, draft.name.clone(), draft.email.clone()))
            .collect();
        for draft in &drafts {
            if !keys.insert((actor.tenant_id(), draft.name.clone(), draft.email.clone())) {
                return Err(AppError::Conflict("duplicate key value".to_owned()));
            }
        }

        let created = drafts.len();
        stored.extend(drafts.into_iter().map(|draft| (actor.tenant_id(), draft)));
        Ok(created)
    }
}

fn actor(tenant_id: TenantId) -> UserIdentity {
    UserIdentity::new("alice", "Alice", None, tenant_id)
}

fn failure_rows(result: &ImportResult) -> Vec<(usize, String)> {
    match result {
        ImportResult::Failure(report) => report
            .entries()
            .iter()
            .map(|entry| (entry.row_number, entry.message.clone()))
            .collect(),
        ImportResult::Success { .. } => Vec::new(),
    }
}

async fn run(
    profile: FakeContactProfile,
    actor: &UserIdentity,
    csv: &str,
) -> (AppResult<ImportResult>, CsvImporter<FakeContactProfile>) {
    let importer = CsvImporter::new(profile);
    let result = importer
        .run(actor, csv.as_bytes(), CsvDelimiter::COMMA)
        .await;
    (result, importer)
}

#[tokio::test]
async fn header_only_input_succeeds_without_writing() {
    let tenant_id = TenantId::new();
    let (result, importer) = run(
        FakeContactProfile::new(),
        &actor(tenant_id),
        "Name,Email,Kind\n",
    )
    .await;

    assert!(matches!(result, Ok(ImportResult::Success { created: 0 })));
    assert_eq!(importer.profile().stored_count().await, 0);
}

#[tokio::test]
async fn all_valid_rows_are_written() {
    let tenant_id = TenantId::new();
    let csv = "Name,Email,Kind\nAcme,acme@x.com,Alpha\nBeta,beta@x.com,Beta\nGamma,gamma@x.com,Alpha\n";
    let (result, importer) = run(FakeContactProfile::new(), &actor(tenant_id), csv).await;

    assert!(matches!(result, Ok(ImportResult::Success { created: 3 })));
    let stored = importer.profile().stored.lock().await;
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[1].1.name, "Beta");
    assert_eq!(stored[1].1.kind, "b");
}

#[tokio::test]
async fn any_invalid_row_prevents_every_write() {
    let tenant_id = TenantId::new();
    let csv = "Name,Email,Kind\nAcme,acme@x.com,Alpha\nBeta,beta@x.com,Unknown\nGamma,gamma@x.com,Alpha\n";
    let (result, importer) = run(FakeContactProfile::new(), &actor(tenant_id), csv).await;

    assert!(result.is_ok());
    let result = result.unwrap_or_else(|_| unreachable!());
    assert_eq!(failure_rows(&result), vec![(3, "invalid kind".to_owned())]);
    assert_eq!(importer.profile().stored_count().await, 0);
}

#[tokio::test]
async fn only_the_second_in_file_duplicate_is_flagged() {
    let tenant_id = TenantId::new();
    let csv = "Name,Email,Kind\nAcme,acme@x.com,Alpha\nAcme,acme@x.com,Alpha\nBeta,beta@x.com,Nope\n";
    let (result, importer) = run(FakeContactProfile::new(), &actor(tenant_id), csv).await;

    let result = result.unwrap_or_else(|_| unreachable!());
    assert_eq!(
        failure_rows(&result),
        vec![
            (3, "duplicate in file".to_owned()),
            (4, "invalid kind".to_owned())
        ]
    );
    assert_eq!(importer.profile().stored_count().await, 0);
}

#[tokio::test]
async fn row_errors_are_reported_in_check_order() {
    let tenant_id = TenantId::new();
    let profile = FakeContactProfile::new();
    profile.seed(tenant_id, "Acme", "acme@x.com").await;
    let csv = "Name,Email,Kind\nAcme,acme@x.com,Alpha\nAcme,acme@x.com,Zeta\n";
    let (result, _) = run(profile, &actor(tenant_id), csv).await;

    let result = result.unwrap_or_else(|_| unreachable!());
    assert_eq!(
        failure_rows(&result),
        vec![
            (2, "already registered".to_owned()),
            (
                3,
                "invalid kind / duplicate in file / already registered".to_owned()
            ),
        ]
    );
}

#[tokio::test]
async fn a_key_registered_in_another_tenant_is_accepted() {
    let profile = FakeContactProfile::new();
    profile.seed(TenantId::new(), "Acme", "acme@x.com").await;
    let csv = "Name,Email,Kind\nAcme,acme@x.com,Alpha\n";
    let (result, importer) = run(profile, &actor(TenantId::new()), csv).await;

    assert!(matches!(result, Ok(ImportResult::Success { created: 1 })));
    assert_eq!(importer.profile().stored_count().await, 2);
}

#[tokio::test]
async fn error_report_keeps_original_text() {
    let tenant_id = TenantId::new();
    let csv = "Name,Email,Kind\n  Acme  ,acme@x.com, alpha! \n";
    let (result, _) = run(FakeContactProfile::new(), &actor(tenant_id), csv).await;

    let report = match result {
        Ok(ImportResult::Failure(report)) => report,
        _ => unreachable!(),
    };
    assert_eq!(
        report.entries()[0].values,
        vec![
            "  Acme  ".to_owned(),
            "acme@x.com".to_owned(),
            " alpha! ".to_owned()
        ]
    );
}

#[tokio::test]
async fn missing_trailing_columns_are_blank() {
    let tenant_id = TenantId::new();
    let csv = "Name,Email,Kind\nAcme\n";
    let (result, _) = run(FakeContactProfile::new(), &actor(tenant_id), csv).await;

    let report = match result {
        Ok(ImportResult::Failure(report)) => report,
        _ => unreachable!(),
    };
    assert_eq!(
        report.entries()[0].values,
        vec!["Acme".to_owned(), String::new(), String::new()]
    );
    assert_eq!(
        report.entries()[0].message,
        "invalid kind / email: enter a valid email address"
    );
}

#[tokio::test]
async fn concurrent_duplicates_are_traced_back_to_rows() {
    let tenant_id = TenantId::new();
    let profile = FakeContactProfile::new();
    *profile.write_behaviour.lock().await = WriteBehaviour::ConflictAfterInserting(vec![(
        "Beta".to_owned(),
        "beta@x.com".to_owned(),
    )]);
    let csv = "Name,Email,Kind\nAcme,acme@x.com,Alpha\nBeta,beta@x.com,Beta\n";
    let (result, importer) = run(profile, &actor(tenant_id), csv).await;

    let result = result.unwrap_or_else(|_| unreachable!());
    assert_eq!(
        failure_rows(&result),
        vec![(3, "created concurrently".to_owned())]
    );
    assert_eq!(importer.profile().stored_count().await, 1);
}

#[tokio::test]
async fn unidentified_conflict_becomes_row_zero() {
    let tenant_id = TenantId::new();
    let profile = FakeContactProfile::new();
    *profile.write_behaviour.lock().await = WriteBehaviour::ConflictAfterInserting(Vec::new());
    let csv = "Name,Email,Kind\nAcme,acme@x.com,Alpha\n";
    let (result, _) = run(profile, &actor(tenant_id), csv).await;

    let report = match result {
        Ok(ImportResult::Failure(report)) => report,
        _ => unreachable!(),
    };
    assert_eq!(report.entries().len(), 1);
    assert_eq!(report.entries()[0].row_number, 0);
    assert_eq!(report.entries()[0].message, INTEGRITY_FAILURE_MESSAGE);
    assert!(report.entries()[0].values.iter().all(String::is_empty));
}

#[tokio::test]
async fn other_write_failures_become_row_zero() {
    let tenant_id = TenantId::new();
    let profile = FakeContactProfile::new();
    *profile.write_behaviour.lock().await = WriteBehaviour::Fail;
    let csv = "Name,Email,Kind\nAcme,acme@x.com,Alpha\n";
    let (result, _) = run(profile, &actor(tenant_id), csv).await;

    let result = result.unwrap_or_else(|_| unreachable!());
    assert_eq!(
        failure_rows(&result),
        vec![(0, INTEGRITY_FAILURE_MESSAGE.to_owned())]
    );
}

#[tokio::test]
async fn missing_headers_abort_the_import() {
    let tenant_id = TenantId::new();
    let (result, _) = run(
        FakeContactProfile::new(),
        &actor(tenant_id),
        "Name,Extra\nAcme,x\n",
    )
    .await;

    match result {
        Err(AppError::Validation(message)) => {
            assert_eq!(message, "invalid CSV header. missing: Email, Kind");
        }
        _ => unreachable!(),
    }
}

#[test]
fn wrong_delimiter_adds_a_hint() {
    let result = parse_csv(b"Name,Email,Kind\n", CsvDelimiter::TAB, HEADERS);
    match result {
        Err(AppError::Validation(message)) => {
            assert!(message.starts_with("invalid CSV header. missing: Name, Email, Kind"));
            assert!(message.contains("delimiter"));
        }
        _ => unreachable!(),
    }
}

#[test]
fn parser_strips_bom_and_trims_headers() {
    let bytes = "\u{feff} Name ,Email,,Kind\nAcme,acme@x.com,ignored,Alpha\n".as_bytes();
    let parsed = parse_csv(bytes, CsvDelimiter::COMMA, HEADERS);

    assert!(parsed.is_ok());
    let parsed = parsed.unwrap_or_else(|_| unreachable!());
    assert_eq!(parsed.headers, vec!["Name", "Email", "Kind"]);
    assert_eq!(parsed.rows[0].row_number(), 2);
    assert_eq!(parsed.rows[0].get("Name"), "Acme");
    assert_eq!(parsed.rows[0].get("Kind"), "Alpha");
    assert_eq!(parsed.rows[0].get("Unknown"), "");
}

#[test]
fn parser_rejects_non_utf8_input() {
    let result = parse_csv(&[0xff, 0xfe, 0x00], CsvDelimiter::COMMA, HEADERS);
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[test]
fn parser_honours_tab_delimiter() {
    let parsed = parse_csv(
        b"Name\tEmail\tKind\nAcme, Inc.\tacme@x.com\tAlpha\n",
        CsvDelimiter::TAB,
        HEADERS,
    );
    let parsed = parsed.unwrap_or_else(|_| unreachable!());
    assert_eq!(parsed.rows[0].get("Name"), "Acme, Inc.");
}

#[test]
fn seen_keys_flag_repeats_even_after_invalid_rows() {
    let profile = FakeContactProfile::new();
    let mut seen = SeenKeys::new();
    let row = |number: usize, kind: &str| {
        ImportRow::new(
            number,
            vec![
                ("Name".to_owned(), "Acme".to_owned()),
                ("Email".to_owned(), "acme@x.com".to_owned()),
                ("Kind".to_owned(), kind.to_owned()),
            ],
        )
    };

    let first = validate_row(&profile, &row(2, "Bogus"), &mut seen);
    let second = validate_row(&profile, &row(3, "Alpha"), &mut seen);

    assert_eq!(first.errors(), ["invalid kind".to_owned()]);
    assert_eq!(second.errors(), ["duplicate in file".to_owned()]);
    assert_eq!(seen.len(), 1);
}

#[tokio::test]
async fn error_report_serializes_with_bom_and_extra_columns() -> AppResult<()> {
    let tenant_id = TenantId::new();
    let csv = "Name,Email,Kind\n\"Acme, Inc.\",acme@x.com,Nope\n";
    let (result, _) = run(FakeContactProfile::new(), &actor(tenant_id), csv).await;

    let report = match result? {
        ImportResult::Failure(report) => report,
        ImportResult::Success { .. } => unreachable!(),
    };
    let bytes = report.to_csv_bytes()?;
    assert!(bytes.starts_with("\u{feff}".as_bytes()));

    let text = String::from_utf8(bytes).unwrap_or_default();
    let lines: Vec<&str> = text.trim_start_matches('\u{feff}').lines().collect();
    assert_eq!(lines[0], "Row,Name,Email,Kind,Errors");
    assert_eq!(lines[1], "2,\"Acme, Inc.\",acme@x.com,Nope,invalid kind");

    let at = NaiveDate::from_ymd_opt(2024, 3, 9)
        .and_then(|date| date.and_hms_opt(7, 5, 1))
        .unwrap_or_default();
    assert_eq!(
        report.file_name(at),
        "contacts_import_error_20240309070501.csv"
    );
    Ok(())
}

#[test]
fn file_names_use_second_precision_timestamps() {
    let at = NaiveDate::from_ymd_opt(2025, 12, 31)
        .and_then(|date| date.and_hms_opt(23, 59, 58))
        .unwrap_or_default();
    assert_eq!(
        timestamped_file_name("partners", at),
        "partners_20251231235958.csv"
    );
}

#[test]
fn delimiters_parse_from_configuration_values() {
    assert_eq!("tab".parse::<CsvDelimiter>().ok(), Some(CsvDelimiter::TAB));
    assert_eq!(";".parse::<CsvDelimiter>().ok().map(CsvDelimiter::as_byte), Some(b';'));
    assert!("ab".parse::<CsvDelimiter>().is_err());
    assert!("\"".parse::<CsvDelimiter>().is_err());
}
