use clap::ValueEnum;
use std::str::FromStr;

pub enum DbAuth {
    /// Integrated Windows / Kerberos authentication via the driver
    Trusted,
    /// SQL Server login with username and password
    SqlServer(String, String),
}

impl DbAuth {
    pub fn new(r#type: &AuthType, username: Option<String>, password: Option<String>) -> Self {
        match (r#type, username, password) {
            (AuthType::Sql, Some(username), Some(password)) => Self::SqlServer(username, password),
            _ => Self::Trusted,
        }
    }

    /// Connection string attributes for this method
    pub(crate) fn attributes(&self) -> String {
        match self {
            Self::Trusted => "Trusted_Connection=yes;".to_string(),
            Self::SqlServer(username, password) => {
                format!("UID={};PWD={};", escape_attribute(username), escape_attribute(password))
            }
        }
    }
}

impl std::fmt::Display for DbAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trusted => write!(f, "Trusted"),
            Self::SqlServer(_, _) => write!(f, "SQL Server"),
        }
    }
}

impl std::fmt::Debug for DbAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trusted => write!(f, "Trusted"),
            Self::SqlServer(username, _) => write!(f, "SqlServer({}, ***)", username),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum AuthType {
    Trusted,
    Sql,
}

impl FromStr for AuthType {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trusted" | "integrated" | "kerberos" => Ok(Self::Trusted),
            "sql" | "sqlserver" => Ok(Self::Sql),
            _ => Err(()),
        }
    }
}

/// Brace-quote a connection string value that contains `;` or `}`
fn escape_attribute(value: &str) -> String {
    if value.contains([';', '{', '}']) {
        format!("{{{}}}", value.replace('}', "}}"))
    } else {
        value.to_string()
    }
}
