use crate::error::{BadEnvVarSnafu, ParsePortSnafu, RosterError, RosterResult};
use dotenvy::var;
use snafu::ResultExt;
use std::{env::VarError, path::PathBuf};

const DEFAULT_PORT: &str = "3000";
const DEFAULT_SERVER_IP: &str = "0.0.0.0";
const DEFAULT_DATA_FILE: &str = "students.json";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreKind {
    File(PathBuf),
    Memory,
}

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    server_ip: String,
    port: u16,
    store_kind: StoreKind,
}

impl RuntimeConfiguration {
    pub fn new() -> RosterResult<Self> {
        let port = env_var_or("PORT", DEFAULT_PORT)?
            .parse::<u16>()
            .context(ParsePortSnafu)?;
        let server_ip = env_var_or("ROSTER_SERVER_IP", DEFAULT_SERVER_IP)?;

        let store_kind = match env_var_or("ROSTER_STORE", "file")?.as_str() {
            "file" => StoreKind::File(env_var_or("ROSTER_DATA_FILE", DEFAULT_DATA_FILE)?.into()),
            "memory" => StoreKind::Memory,
            other => {
                return Err(RosterError::UnknownStoreKind {
                    found: other.to_string(),
                });
            }
        };

        Ok(Self {
            server_ip,
            port,
            store_kind,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_ip, self.port)
    }

    pub const fn store_kind(&self) -> &StoreKind {
        &self.store_kind
    }
}

/// Reads `name` from the environment (or `.env`), falling back to `default` only when it is unset.
fn env_var_or(name: &'static str, default: &str) -> RosterResult<String> {
    match var(name) {
        Ok(value) => Ok(value),
        Err(dotenvy::Error::EnvVar(VarError::NotPresent)) => Ok(default.to_string()),
        Err(source) => Err(source).context(BadEnvVarSnafu { name }),
    }
}
