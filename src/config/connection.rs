//! Database drivers a dataset connection can use.

use std::fmt;
use std::str::FromStr;

/// Error type for driver names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    #[error("Unsupported driver: {0}. Supported: sqlite, duckdb, mssql, postgres, mysql")]
    UnsupportedDriver(String),
}

/// Supported database drivers.
///
/// SQLite runs in-process; every other driver is reached through the
/// query worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    /// SQLite (file or `:memory:`), executed in-process
    Sqlite,
    /// DuckDB (file or in-memory)
    DuckDb,
    /// Microsoft SQL Server
    MsSql,
    Postgres,
    MySql,
}

impl Driver {
    /// Get the driver name as the worker expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Driver::Sqlite => "sqlite",
            Driver::DuckDb => "duckdb",
            Driver::MsSql => "mssql",
            Driver::Postgres => "postgres",
            Driver::MySql => "mysql",
        }
    }

    /// Whether queries for this driver go through the external worker.
    pub fn requires_worker(&self) -> bool {
        !matches!(self, Driver::Sqlite)
    }
}

impl FromStr for Driver {
    type Err = ConnectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Driver::Sqlite),
            "duckdb" | "duck" => Ok(Driver::DuckDb),
            "mssql" | "sqlserver" | "sql_server" => Ok(Driver::MsSql),
            "postgres" | "postgresql" | "pg" => Ok(Driver::Postgres),
            "mysql" | "mariadb" => Ok(Driver::MySql),
            other => Err(ConnectionError::UnsupportedDriver(other.to_string())),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
