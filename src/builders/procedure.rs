use crate::error::{OraRsError, Result};
use crate::types::BindParam;

/// Builds the anonymous block that calls a packaged stored procedure.
#[derive(Debug, Clone)]
pub struct ProcedureCall<'a> {
    package: &'a str,
    procedure: &'a str,
    params: &'a [BindParam],
}

impl<'a> ProcedureCall<'a> {
    /// Fails if either the package or the procedure name is empty.
    pub fn new(package: &'a str, procedure: &'a str, params: &'a [BindParam]) -> Result<Self> {
        if package.is_empty() || procedure.is_empty() {
            return Err(OraRsError::InvalidArgument(format!(
                "stored procedure requires a package and a procedure name, got `{package}{procedure}`"
            )));
        }
        Ok(Self {
            package,
            procedure,
            params,
        })
    }

    /// `BEGIN pkg.proc(:p1,:p2); END;`
    pub fn build_sql(&self) -> String {
        let mut sql = String::with_capacity(64);
        sql.push_str("BEGIN ");
        sql.push_str(self.package);
        sql.push('.');
        sql.push_str(self.procedure);
        sql.push('(');
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                sql.push(',');
            }
            sql.push_str(&param.name);
        }
        sql.push_str("); END;");
        sql
    }

    /// Returns true if any parameter is an OUT cursor.
    pub fn has_cursor(&self) -> bool {
        self.params.iter().any(BindParam::is_cursor)
    }

    pub fn params(&self) -> &'a [BindParam] {
        self.params
    }
}
