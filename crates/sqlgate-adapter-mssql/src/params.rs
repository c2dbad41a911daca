//! Named parameter binding.
//!
//! tiberius binds positionally (`@P1`, `@P2`, ...). Statements refer to
//! parameters by name, so each bound value gets a `DECLARE @name TYPE = @Pn;`
//! line ahead of the statement text.

use serde_json::Value;
use sqlgate_runtime::{ExecutionError, SqlStatement};
use tiberius::Query;

/// A value bound to one positional placeholder.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Param {
    Text(String),
    BigInt(i64),
    Float(f64),
    Bit(bool),
}

/// Statement text with its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Bound {
    pub text: String,
    pub params: Vec<Param>,
}

impl Bound {
    pub fn is_parameterized(&self) -> bool {
        !self.params.is_empty()
    }

    pub fn into_query(self) -> Query<'static> {
        let mut query = Query::new(self.text);
        for param in self.params {
            match param {
                Param::Text(v) => query.bind(v),
                Param::BigInt(v) => query.bind(v),
                Param::Float(v) => query.bind(v),
                Param::Bit(v) => query.bind(v),
            }
        }
        query
    }
}

/// Rewrite named parameters into a declaration prelude plus positional binds.
pub(crate) fn bind(statement: &SqlStatement) -> Result<Bound, ExecutionError> {
    let mut prelude = String::new();
    let mut params = Vec::with_capacity(statement.parameters.len());

    for (name, value) in &statement.parameters {
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ExecutionError::Parameter {
                name: name.clone(),
                reason: "names may only contain letters, digits and underscores".to_string(),
            });
        }

        let (sql_type, param) = match value {
            Value::Null => {
                prelude.push_str(&format!("DECLARE @{} NVARCHAR(MAX) = NULL;\n", name));
                continue;
            }
            Value::Bool(v) => ("BIT", Param::Bit(*v)),
            Value::Number(n) => match n.as_i64() {
                Some(v) => ("BIGINT", Param::BigInt(v)),
                None => match n.as_f64() {
                    Some(v) => ("FLOAT", Param::Float(v)),
                    None => {
                        return Err(ExecutionError::Parameter {
                            name: name.clone(),
                            reason: format!("number {} is out of range", n),
                        });
                    }
                },
            },
            Value::String(s) => ("NVARCHAR(MAX)", Param::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => ("NVARCHAR(MAX)", Param::Text(value.to_string())),
        };

        params.push(param);
        prelude.push_str(&format!(
            "DECLARE @{} {} = @P{};\n",
            name,
            sql_type,
            params.len()
        ));
    }

    Ok(Bound {
        text: format!("{}{}", prelude, statement.text),
        params,
    })
}
