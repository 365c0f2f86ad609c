//! ODBC-backed SQL Server store.
//!
//! Uses the Microsoft ODBC Driver for SQL Server, which handles integrated
//! (Windows/Kerberos) authentication through `Trusted_Connection=yes`.
//!
//! **Requirements:**
//! - Windows: the driver ships with an MSI from Microsoft (SSPI is automatic)
//! - Linux: `apt install msodbcsql17` or `yum install msodbcsql17`, plus a
//!   Kerberos ticket (`kinit user@REALM`) for trusted connections
//! - macOS: `brew install msodbcsql17`
//!
//! One connection serves both the full-table read and the replacement
//! write. The connection is closed when the store is dropped.

use super::{ConnectionGuard, DbAuth, Store, StoreError, WriteOptions};
use crate::dataset::{Column, ColumnKind, Dataset, Value};
use crate::table::TableName;
use odbc_api::{
    Connection, ConnectionOptions, Cursor, DataType, Environment, ResultSetMetadata,
    buffers::TextRowSet, sys::SqlDataType,
};

/// Driver named in the connection string unless overridden
pub const DEFAULT_DRIVER: &str = "ODBC Driver 17 for SQL Server";

/// Rows fetched per round trip.
const FETCH_BATCH_SIZE: usize = 5000;

/// Upper bound for a single text cell in bytes. `NVARCHAR(MAX)` columns
/// report no length, so the buffer needs an explicit cap. Longer values
/// fail the fetch instead of being cut.
const MAX_TEXT_LENGTH: usize = 65536;

/// Maximum rows per INSERT VALUES clause (MSSQL limit is 1000).
const MAX_ROWS_PER_INSERT: usize = 1000;

/// Where and how to connect
#[derive(Debug)]
pub struct ConnectionSettings {
    pub driver: String,
    pub server: String,
    pub database: String,
    pub auth: DbAuth,
}

impl ConnectionSettings {
    /// Settings for a trusted connection using [`DEFAULT_DRIVER`]
    pub fn new(server: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            driver: DEFAULT_DRIVER.to_string(),
            server: server.into(),
            database: database.into(),
            auth: DbAuth::Trusted,
        }
    }

    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = driver.into();
        self
    }

    pub fn with_auth(mut self, auth: DbAuth) -> Self {
        self.auth = auth;
        self
    }

    /// Full ODBC connection string, credentials included
    ///
    /// # Example
    /// ```
    /// use datasync::client::ConnectionSettings;
    ///
    /// let settings = ConnectionSettings::new("LAPTOP-U3795DN8", "mydatabase");
    /// assert_eq!(
    ///     settings.connection_string(),
    ///     "Driver={ODBC Driver 17 for SQL Server};Server=LAPTOP-U3795DN8;Database=mydatabase;Trusted_Connection=yes;"
    /// );
    /// ```
    pub fn connection_string(&self) -> String {
        format!(
            "Driver={{{}}};Server={};Database={};{}",
            self.driver,
            self.server,
            self.database,
            self.auth.attributes()
        )
    }
}

/// SQL Server store over a single ODBC connection
pub struct OdbcStore<'env> {
    conn: ConnectionGuard<Connection<'env>>,
    server: String,
    database: String,
}

impl<'env> OdbcStore<'env> {
    /// Open a connection
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not installed, the server cannot
    /// be reached, or authentication fails.
    pub fn connect(env: &'env Environment, settings: &ConnectionSettings) -> Result<Self, StoreError> {
        log::debug!(
            "ODBC connection string (credentials hidden): Driver={{{}}};Server={};Database={};Auth={};",
            settings.driver,
            settings.server,
            settings.database,
            settings.auth
        );

        let conn = env
            .connect_with_connection_string(
                &settings.connection_string(),
                ConnectionOptions::default(),
            )?;

        log::info!(
            "Connected to SQL Server via ODBC ({}): {}/{}",
            settings.auth,
            settings.server,
            settings.database
        );

        Ok(Self {
            conn: ConnectionGuard::new(conn),
            server: settings.server.clone(),
            database: settings.database.clone(),
        })
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    fn connection(&self) -> Result<&Connection<'env>, StoreError> {
        self.conn
            .get()
            .ok_or_else(|| StoreError::Rejected("connection is closed".to_string()))
    }

    fn table_exists(conn: &Connection<'_>, table: &TableName) -> Result<bool, StoreError> {
        let data = run_query(conn, &table_exists_sql(table))?;
        Ok(data.get(0, "table_exists").and_then(Value::as_i64) == Some(1))
    }

    fn replace_in_transaction(
        conn: &Connection<'_>,
        table: &TableName,
        columns: &[Column],
        data: &Dataset,
        options: &WriteOptions,
    ) -> Result<u64, StoreError> {
        if Self::table_exists(conn, table)? {
            conn.execute(&drop_table_sql(table), ())?;
            log::debug!("Dropped table: {}", table);
        }

        conn.execute(&create_table_sql(table, columns), ())?;
        log::debug!("Created table: {} ({} columns)", table, columns.len());

        // One statement per execute, so every statement's error is reported
        let statements = insert_statements(table, columns, data, options.index);
        let mut stmt = conn.preallocate()?;
        let mut counts = Vec::with_capacity(statements.len());
        for sql in &statements {
            stmt.execute(sql, ())?;
            counts.push(stmt.row_count()?);
        }
        let inserted = check_inserted(data.num_rows(), &counts)?;

        log::debug!(
            "Inserted {} rows into {} via {} INSERT statement(s)",
            inserted,
            table,
            statements.len()
        );

        Ok(inserted as u64)
    }
}

impl Store for OdbcStore<'_> {
    fn query(&self, sql: &str) -> Result<Dataset, StoreError> {
        run_query(self.connection()?, sql)
    }

    /// DROP + CREATE + INSERT run in one transaction, so a failure leaves
    /// the previous table in place.
    fn write_table(
        &self,
        table: &TableName,
        data: &Dataset,
        options: &WriteOptions,
    ) -> Result<u64, StoreError> {
        let conn = self.connection()?;
        let columns = output_columns(data, options.index)?;

        conn.set_autocommit(false)?;
        let outcome = Self::replace_in_transaction(conn, table, &columns, data, options)
            .and_then(|count| {
                conn.commit()?;
                Ok(count)
            });

        if outcome.is_err() {
            if let Err(e) = conn.rollback() {
                log::warn!("Rollback of {} failed: {}", table, e);
            }
        }
        if let Err(e) = conn.set_autocommit(true) {
            log::warn!("Could not restore autocommit: {}", e);
        }

        outcome
    }
}

/// Execute `sql` and read the whole result set
fn run_query(conn: &Connection<'_>, sql: &str) -> Result<Dataset, StoreError> {
    let Some(mut cursor) = conn.execute(sql, ())? else {
        return Err(StoreError::Rejected(format!(
            "query returned no result set: {}",
            sql
        )));
    };

    let num_cols = cursor.num_result_cols()?.max(0) as u16;
    let mut columns = Vec::with_capacity(num_cols as usize);
    for number in 1..=num_cols {
        let name = cursor.col_name(number)?;
        let data_type = cursor.col_data_type(number)?;
        let mut column = Column::new(name, column_kind(&data_type));
        if let Some(sql_type) = declared_type(&data_type) {
            column = column.with_sql_type(sql_type);
        }
        columns.push(column);
    }

    let mut buffers = TextRowSet::for_cursor(FETCH_BATCH_SIZE, &mut cursor, Some(MAX_TEXT_LENGTH))?;
    let mut row_cursor = cursor.bind_buffer(&mut buffers)?;

    let mut rows = Vec::new();
    while let Some(batch) = row_cursor
        .fetch_with_truncation_check(true)
        .map_err(|e| truncation_error(e, &columns))?
    {
        for row_idx in 0..batch.num_rows() {
            let row = columns
                .iter()
                .enumerate()
                .map(|(col_idx, column)| {
                    let text = batch.at(col_idx, row_idx).map(String::from_utf8_lossy);
                    column.kind.parse(text.as_deref())
                })
                .collect();
            rows.push(row);
        }
    }

    Dataset::new(columns, rows).map_err(|e| StoreError::Rejected(e.to_string()))
}

/// Map the driver-reported type to a column kind
fn column_kind(data_type: &DataType) -> ColumnKind {
    match data_type {
        DataType::Bit
        | DataType::TinyInt
        | DataType::SmallInt
        | DataType::Integer
        | DataType::BigInt => ColumnKind::Integer,
        DataType::Decimal {
            precision,
            scale: 0,
        }
        | DataType::Numeric {
            precision,
            scale: 0,
        } if *precision <= 18 => ColumnKind::Integer,
        DataType::Real
        | DataType::Float { .. }
        | DataType::Double
        | DataType::Decimal { .. }
        | DataType::Numeric { .. } => ColumnKind::Float,
        _ => ColumnKind::Text,
    }
}

/// SQL Server type to recreate a column with, when the reported type
/// names one that survives a text round trip
fn declared_type(data_type: &DataType) -> Option<String> {
    let sized = |name: &str, length: &Option<std::num::NonZeroUsize>| match length {
        Some(n) if n.get() <= 4000 => format!("{}({})", name, n),
        _ => format!("{}(MAX)", name),
    };
    let declared = match data_type {
        DataType::Bit => "BIT".to_string(),
        DataType::TinyInt => "TINYINT".to_string(),
        DataType::SmallInt => "SMALLINT".to_string(),
        DataType::Integer => "INT".to_string(),
        DataType::BigInt => "BIGINT".to_string(),
        DataType::Real => "REAL".to_string(),
        DataType::Float { .. } | DataType::Double => "FLOAT".to_string(),
        DataType::Decimal { precision, scale } => format!("DECIMAL({}, {})", precision, scale),
        DataType::Numeric { precision, scale } => format!("NUMERIC({}, {})", precision, scale),
        DataType::Date => "DATE".to_string(),
        DataType::Time { precision } => format!("TIME({})", precision),
        DataType::Timestamp { precision: 3 } => "DATETIME".to_string(),
        DataType::Timestamp { precision } => format!("DATETIME2({})", precision),
        DataType::Char { length } => sized("CHAR", length),
        DataType::WChar { length } => sized("NCHAR", length),
        DataType::Varchar { length } => sized("VARCHAR", length),
        DataType::WVarchar { length } => sized("NVARCHAR", length),
        DataType::LongVarchar { .. } => "VARCHAR(MAX)".to_string(),
        DataType::Other { data_type, .. } if *data_type == SqlDataType::EXT_GUID => {
            "UNIQUEIDENTIFIER".to_string()
        }
        _ => return None,
    };
    Some(declared)
}

/// Turn a buffer overflow into an error naming the column
fn truncation_error(error: odbc_api::Error, columns: &[Column]) -> StoreError {
    match error {
        odbc_api::Error::TooLargeValueForBuffer { buffer_index, .. } => StoreError::Truncated {
            column: columns
                .get(buffer_index)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("#{}", buffer_index + 1)),
            limit: MAX_TEXT_LENGTH,
        },
        other => StoreError::Odbc(other),
    }
}

/// Total rows inserted, failing when the server reports fewer rows than
/// were sent. Counts are `None` when the server suppresses them
/// (`SET NOCOUNT ON`); the total then falls back to the rows sent.
fn check_inserted(expected: usize, counts: &[Option<usize>]) -> Result<usize, StoreError> {
    let Some(inserted) = counts.iter().copied().sum::<Option<usize>>() else {
        return Ok(expected);
    };
    if inserted == expected {
        Ok(inserted)
    } else {
        Err(StoreError::Rejected(format!(
            "inserted {} of {} rows",
            inserted, expected
        )))
    }
}

/// Columns as written, with the optional leading `index` column
fn output_columns(data: &Dataset, index: bool) -> Result<Vec<Column>, StoreError> {
    let mut columns = Vec::with_capacity(data.num_columns() + 1);
    if index {
        if data.contains_column("index") {
            return Err(StoreError::Rejected(
                "cannot write index: dataset already has a column named 'index'".to_string(),
            ));
        }
        columns.push(Column::new("index", ColumnKind::Integer));
    }
    columns.extend(data.columns().iter().cloned());

    if columns.is_empty() {
        return Err(StoreError::Rejected(
            "cannot create a table with no columns".to_string(),
        ));
    }
    Ok(columns)
}

/// Quote an MSSQL identifier with brackets.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

fn table_exists_sql(table: &TableName) -> String {
    format!(
        "SELECT CASE WHEN OBJECT_ID(N'{}', N'U') IS NULL THEN 0 ELSE 1 END AS table_exists",
        table.quoted().replace('\'', "''")
    )
}

fn drop_table_sql(table: &TableName) -> String {
    format!("DROP TABLE {}", table.quoted())
}

fn create_table_sql(table: &TableName, columns: &[Column]) -> String {
    let definitions: Vec<String> = columns
        .iter()
        .map(|c| format!("{} {} NULL", quote_ident(&c.name), c.declared_type()))
        .collect();
    format!("CREATE TABLE {} ({})", table.quoted(), definitions.join(", "))
}

/// Multi-row INSERT statements covering every row of `data`
fn insert_statements(
    table: &TableName,
    columns: &[Column],
    data: &Dataset,
    index: bool,
) -> Vec<String> {
    let col_str = columns
        .iter()
        .map(|c| quote_ident(&c.name))
        .collect::<Vec<_>>()
        .join(", ");

    let labelled: Vec<(usize, &[Value])> = data
        .index()
        .iter()
        .copied()
        .zip(data.rows().iter().map(Vec::as_slice))
        .collect();

    labelled
        .chunks(MAX_ROWS_PER_INSERT)
        .map(|batch| {
            let groups: Vec<String> = batch
                .iter()
                .map(|(label, row)| {
                    let mut values = Vec::with_capacity(row.len() + 1);
                    if index {
                        values.push(label.to_string());
                    }
                    values.extend(row.iter().map(sql_literal));
                    format!("({})", values.join(", "))
                })
                .collect();
            format!(
                "INSERT INTO {} ({}) VALUES {}",
                table.quoted(),
                col_str,
                groups.join(", ")
            )
        })
        .collect()
}

/// Render a value as a T-SQL literal
fn sql_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(n) => n.to_string(),
        Value::Float(f) => {
            if f.is_finite() {
                format!("{:?}", f)
            } else {
                "NULL".to_string()
            }
        }
        Value::Text(s) => format!("N'{}'", s.replace('\'', "''")),
    }
}
