//! Placeholder/value alignment across the public clause builders.

use jobly::{
    Company, FieldMap, Job, JoblyError, Payload, SqlValue, build_company_filter, build_job_filter,
    build_set_clause,
};

/// Every `$n` in `text`, in order of appearance.
fn placeholders(text: &str) -> Vec<usize> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find('$') {
        rest = &rest[pos + 1..];
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        out.push(digits.parse().expect("placeholder index"));
        rest = &rest[digits.len()..];
    }
    out
}

#[test]
fn set_placeholders_count_up_from_one() {
    for n in 1..=12usize {
        let payload: Payload = (0..n).map(|i| (format!("f{i}"), format!("v{i}"))).collect();
        let clause = build_set_clause(&payload, &FieldMap::identity()).unwrap();

        assert_eq!(placeholders(clause.text()), (1..=n).collect::<Vec<_>>());
        let expected: Vec<SqlValue> = payload.values().cloned().collect();
        assert_eq!(clause.values(), expected.as_slice());
    }
}

#[test]
fn company_update_from_request_json() {
    let payload: Payload =
        serde_json::from_str(r#"{"numEmployees": "4", "description": "a company"}"#).unwrap();
    let clause = build_set_clause(&payload, &Company::FIELDS).unwrap();

    assert_eq!(clause.text(), r#""num_employees"=$1, "description"=$2"#);
    assert_eq!(
        clause.values(),
        &[SqlValue::from("4"), SqlValue::from("a company")]
    );
    assert_eq!(clause.next_placeholder(), 3);
}

#[test]
fn job_update_translates_company_handle() {
    let payload = Payload::new()
        .with("salary", 45000)
        .with("companyHandle", "c2");
    let clause = build_set_clause(&payload, &Job::FIELDS).unwrap();
    assert_eq!(clause.text(), r#""salary"=$1, "company_handle"=$2"#);
}

#[test]
fn empty_update_is_invalid_input() {
    let payload: Payload = serde_json::from_str("{}").unwrap();
    let err = build_set_clause(&payload, &Job::FIELDS).unwrap_err();
    assert!(matches!(err, JoblyError::InvalidInput(_)));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn company_filter_from_request_json() {
    let payload: Payload =
        serde_json::from_str(r#"{"name": "cat", "maxEmployees": 1000, "minEmployees": 0}"#)
            .unwrap();
    let clause = build_company_filter(&payload).unwrap();

    assert_eq!(
        clause.text(),
        "LOWER(name) LIKE $1 AND num_employees < $2 AND num_employees > $3"
    );
    assert_eq!(
        clause.values(),
        &[
            SqlValue::from("%cat%"),
            SqlValue::from("1000"),
            SqlValue::from("0")
        ]
    );
}

#[test]
fn filter_placeholders_match_values_in_any_key_order() {
    let orders = [
        ["title", "minSalary", "hasEquity"],
        ["hasEquity", "title", "minSalary"],
        ["minSalary", "hasEquity", "title"],
    ];
    for order in orders {
        let payload: Payload = order
            .iter()
            .map(|k| match *k {
                "title" => (*k, SqlValue::from("Eng")),
                "minSalary" => (*k, SqlValue::from(1000)),
                _ => (*k, SqlValue::from(true)),
            })
            .collect();
        let clause = build_job_filter(&payload).unwrap();

        assert_eq!(placeholders(clause.text()), vec![1, 2, 3]);
        let equity_pos = order.iter().position(|k| *k == "hasEquity").unwrap();
        assert_eq!(clause.values()[equity_pos], SqlValue::from(0));
        let title_pos = order.iter().position(|k| *k == "title").unwrap();
        assert_eq!(clause.values()[title_pos], SqlValue::from("%eng%"));
    }
}

#[test]
fn unknown_filter_key_is_bad_request() {
    let payload: Payload = serde_json::from_str(r#"{"bogus": "x"}"#).unwrap();
    for result in [build_company_filter(&payload), build_job_filter(&payload)] {
        let err = result.unwrap_err();
        assert!(matches!(err, JoblyError::InvalidFilter(_)));
        assert_eq!(err.status_code(), 400);
    }
}

#[test]
fn repeated_builds_are_byte_identical() {
    let payload: Payload =
        serde_json::from_str(r#"{"title": "eng", "hasEquity": false, "minSalary": "10"}"#)
            .unwrap();
    let first = serde_json::to_string(&build_job_filter(&payload).unwrap()).unwrap();
    for _ in 0..3 {
        let again = serde_json::to_string(&build_job_filter(&payload).unwrap()).unwrap();
        assert_eq!(first, again);
    }
}
