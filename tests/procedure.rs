use std::sync::Arc;

use orars::drivers::{InMemoryTestDriver, InMemoryTestResponseBuilder};
use orars::traits::DatabaseDriver;
use orars::types::BindValue;
use orars::{
    BindParam, BindType, CommitMode, Connection, ConnectionConfig, NativeError, OraRsClient,
    OraRsError, SqlValue,
};

async fn connect(driver: &Arc<InMemoryTestDriver>, strict: bool) -> Connection {
    OraRsClient::with_driver(Arc::clone(driver) as Arc<dyn DatabaseDriver>)
        .connect(
            ConnectionConfig::new()
                .hostname("orcl")
                .username("scott")
                .strict(strict),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_procedure_with_cursor_returns_cursor_rows() {
    let driver = Arc::new(
        InMemoryTestDriver::new().with_cursor_response(
            InMemoryTestResponseBuilder::new()
                .columns(&["ID", "NAME"])
                .row(&["1", "Alice"])
                .row(&["2", "Bob"])
                .build(),
        ),
    );
    let mut conn = connect(&driver, false).await;
    let params = [
        BindParam::new(":dept", 10),
        BindParam::cursor(":users"),
    ];

    let result = conn
        .stored_procedure("hr_pkg", "list_users", &params)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(
        result.first_row().unwrap().get_str("NAME").unwrap(),
        Some("Alice")
    );

    // Parsed once; the procedure's own execute does not parse again.
    assert_eq!(
        driver.parsed_statements(),
        vec!["BEGIN hr_pkg.list_users(:dept,:users); END;"]
    );

    let cursor = conn.cursor_id().unwrap();
    let queries = driver.recorded_queries();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0].sql, "BEGIN hr_pkg.list_users(:dept,:users); END;");
    assert_eq!(
        queries[0].params,
        vec![
            BindParam::new(":dept", 10),
            BindParam {
                name: ":users".to_string(),
                value: BindValue::Cursor(Some(cursor)),
                bind_type: BindType::Cursor,
                max_length: None,
            },
        ]
    );
    assert_eq!(queries[1].sql, "");
}

#[tokio::test]
async fn test_procedure_reuses_existing_cursor() {
    let driver = Arc::new(InMemoryTestDriver::new());
    let mut conn = connect(&driver, false).await;
    let cursor = conn.cursor().await.unwrap();

    conn.stored_procedure("pkg", "open_rc", &[BindParam::cursor(":rc")])
        .await
        .unwrap();
    assert_eq!(conn.cursor_id(), Some(cursor));
}

#[tokio::test]
async fn test_procedure_without_cursor_returns_statement_rows() {
    let driver = Arc::new(InMemoryTestDriver::new().with_affected_rows(1));
    let mut conn = connect(&driver, false).await;

    let result = conn
        .stored_procedure("acct", "close", &[BindParam::new(":id", 7)])
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_empty());
    driver.assert_last_query(
        "BEGIN acct.close(:id); END;",
        &[BindParam::new(":id", 7)],
    );
    assert!(conn.cursor_id().is_none());
}

#[tokio::test]
async fn test_procedure_runs_under_transaction_mode() {
    let driver = Arc::new(InMemoryTestDriver::new());
    let mut conn = connect(&driver, false).await;

    conn.begin_transaction();
    conn.stored_procedure("acct", "debit", &[BindParam::new(":amount", 5)])
        .await
        .unwrap();
    assert_eq!(driver.last_query().unwrap().mode, CommitMode::NoAutoCommit);
}

#[tokio::test]
async fn test_procedure_out_value() {
    let driver = Arc::new(InMemoryTestDriver::new().with_out_value(":total", 42i64));
    let mut conn = connect(&driver, false).await;

    conn.stored_procedure(
        "acct",
        "balance",
        &[BindParam::new(":total", SqlValue::Null).with_type(BindType::Integer)],
    )
    .await
    .unwrap();
    assert_eq!(
        conn.out_value(":total").await.unwrap(),
        Some(SqlValue::Int64(42))
    );
}

#[tokio::test]
async fn test_procedure_requires_names() {
    let driver = Arc::new(InMemoryTestDriver::new());
    let mut conn = connect(&driver, false).await;

    let err = conn.stored_procedure("", "run", &[]).await.unwrap_err();
    assert!(matches!(err, OraRsError::InvalidArgument(_)));
    let err = conn.stored_procedure("pkg", "", &[]).await.unwrap_err();
    assert!(matches!(err, OraRsError::InvalidArgument(_)));
    assert!(driver.parsed_statements().is_empty());
}

#[tokio::test]
async fn test_procedure_requires_connection() {
    let driver = Arc::new(InMemoryTestDriver::new());
    let mut conn = OraRsClient::with_driver(Arc::clone(&driver) as Arc<dyn DatabaseDriver>)
        .connection(ConnectionConfig::new());

    let err = conn.stored_procedure("pkg", "run", &[]).await.unwrap_err();
    assert!(matches!(err, OraRsError::NotConnected));
}

#[tokio::test]
async fn test_failed_procedure_restores_parsing() {
    let driver = Arc::new(
        InMemoryTestDriver::new()
            .with_failure(NativeError::new("ORA-06550", "PLS-00201: identifier must be declared")),
    );
    let mut conn = connect(&driver, false).await;

    let result = conn.stored_procedure("pkg", "missing", &[]).await.unwrap();
    assert!(result.is_none());
    assert_eq!(conn.error().code, "ORA-06550");

    conn.execute("SELECT 1 FROM dual").await.unwrap();
    assert_eq!(
        driver.parsed_statements(),
        vec!["BEGIN pkg.missing(); END;", "SELECT 1 FROM dual"]
    );
}

#[tokio::test]
async fn test_strict_procedure_failure_restores_parsing() {
    let driver = Arc::new(
        InMemoryTestDriver::new().with_failure(NativeError::new("ORA-20001", "custom failure")),
    );
    let mut conn = connect(&driver, true).await;

    let err = conn.stored_procedure("pkg", "fail", &[]).await.unwrap_err();
    assert!(matches!(err, OraRsError::Execution(ref e) if e.code == "ORA-20001"));

    conn.execute("SELECT 1 FROM dual").await.unwrap();
    assert_eq!(driver.parsed_statements().len(), 2);
}

#[tokio::test]
async fn test_cursor_typed_param_without_handle_gets_one() {
    let driver = Arc::new(
        InMemoryTestDriver::new().with_cursor_response(
            InMemoryTestResponseBuilder::new()
                .columns(&["ID"])
                .row(&["1"])
                .build(),
        ),
    );
    let mut conn = connect(&driver, false).await;
    let param = BindParam {
        name: ":rc".to_string(),
        value: BindValue::Value(SqlValue::Null),
        bind_type: BindType::Cursor,
        max_length: None,
    };

    let result = conn
        .stored_procedure("pkg", "open_rc", &[param])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.len(), 1);

    let cursor = conn.cursor_id().unwrap();
    let queries = driver.recorded_queries();
    assert_eq!(queries.len(), 2);
    assert_eq!(
        queries[0].params,
        vec![BindParam {
            name: ":rc".to_string(),
            value: BindValue::Cursor(Some(cursor)),
            bind_type: BindType::Cursor,
            max_length: None,
        }]
    );
}

#[tokio::test]
async fn test_procedure_bind_failure_restores_parsing() {
    let driver = Arc::new(
        InMemoryTestDriver::new()
            .with_bind_failure(NativeError::new("ORA-01036", "illegal variable name/number")),
    );
    let mut conn = connect(&driver, false).await;

    let result = conn
        .stored_procedure("acct", "close", &[BindParam::new(":id", 7)])
        .await
        .unwrap();
    assert!(result.is_none());
    assert_eq!(conn.error().code, "ORA-01036");
    driver.assert_query_count(0);

    conn.execute("SELECT 1 FROM dual").await.unwrap();
    assert_eq!(
        driver.parsed_statements(),
        vec!["BEGIN acct.close(:id); END;", "SELECT 1 FROM dual"]
    );
}
