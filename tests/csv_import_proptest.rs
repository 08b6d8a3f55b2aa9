use app_lib::db::models::LeadStatus;
use app_lib::engine::csv_import::{parse_leads, LEAD_COLUMNS};
use app_lib::error::AppError;
use proptest::prelude::*;
use proptest::sample::subsequence;

fn cell() -> impl Strategy<Value = String> {
    "[a-z0-9@.]{0,8}"
}

fn row() -> impl Strategy<Value = [String; 4]> {
    [cell(), cell(), cell(), cell()]
}

/// Render rows given in canonical column order under a permuted header.
fn render(order: &[&str], rows: &[[String; 4]]) -> String {
    let mut out = order.join(",");
    for r in rows {
        let cells: Vec<&str> = order
            .iter()
            .map(|col| {
                let idx = LEAD_COLUMNS.iter().position(|c| c == col).unwrap();
                r[idx].as_str()
            })
            .collect();
        out.push('\n');
        out.push_str(&cells.join(","));
    }
    out
}

proptest! {
    #[test]
    fn one_lead_per_row_with_email(
        order in Just(LEAD_COLUMNS.to_vec()).prop_shuffle(),
        rows in prop::collection::vec(row(), 0..20),
    ) {
        let leads = parse_leads(&render(&order, &rows), "owner").unwrap();

        let expected: Vec<&[String; 4]> = rows.iter().filter(|r| !r[1].is_empty()).collect();
        prop_assert_eq!(leads.len(), expected.len());

        for (lead, r) in leads.iter().zip(expected) {
            prop_assert_eq!(&lead.name, &r[0]);
            prop_assert_eq!(&lead.email, &r[1]);
            prop_assert_eq!(&lead.company, &r[2]);
            prop_assert_eq!(&lead.domain, &r[3]);
            prop_assert_eq!(lead.status, LeadStatus::Uploaded);
            prop_assert_eq!(lead.user_id.as_str(), "owner");
        }

        let mut ids: Vec<&str> = leads.iter().map(|l| l.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), leads.len());
    }

    #[test]
    fn missing_headers_are_reported_exactly(
        present in subsequence(LEAD_COLUMNS.to_vec(), 0..LEAD_COLUMNS.len()),
        rows in prop::collection::vec(row(), 0..5),
    ) {
        // An extra column keeps the header line non-blank.
        let mut header: Vec<&str> = present.clone();
        header.push("title");
        let mut text = header.join(",");
        for r in &rows {
            text.push('\n');
            text.push_str(&r.join(","));
        }

        let expected: Vec<String> = LEAD_COLUMNS
            .iter()
            .filter(|c| !present.contains(c))
            .map(|c| c.to_string())
            .collect();

        match parse_leads(&text, "owner") {
            Err(AppError::MissingColumns(missing)) => prop_assert_eq!(missing, expected),
            other => prop_assert!(false, "expected MissingColumns, got {:?}", other),
        }
    }
}
