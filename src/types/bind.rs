use crate::handle::HandleId;
use crate::types::SqlValue;

/// Native type tag a bind slot is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindType {
    /// Character data, the engine's default bind type.
    #[default]
    Char,
    Integer,
    Float,
    /// Physical row identifier.
    RowId,
    /// Result-set cursor, used for OUT cursor parameters of stored procedures.
    Cursor,
}

/// What a bind slot is bound to.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Value(SqlValue),
    /// A cursor handle. `None` lets the connection supply its own cursor.
    Cursor(Option<HandleId>),
}

/// A named bind slot: name, value, type tag and maximum length.
#[derive(Debug, Clone, PartialEq)]
pub struct BindParam {
    pub name: String,
    pub value: BindValue,
    pub bind_type: BindType,
    /// Maximum length of the slot; `None` lets the engine use the value's length.
    pub max_length: Option<i32>,
}

impl BindParam {
    pub fn new(name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self {
            name: name.into(),
            value: BindValue::Value(value.into()),
            bind_type: BindType::default(),
            max_length: None,
        }
    }

    /// An OUT cursor parameter bound to the connection's cursor handle.
    pub fn cursor(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: BindValue::Cursor(None),
            bind_type: BindType::Cursor,
            max_length: None,
        }
    }

    /// An OUT row identifier slot.
    pub fn row_id(name: impl Into<String>, max_length: i32) -> Self {
        Self {
            name: name.into(),
            value: BindValue::Value(SqlValue::Null),
            bind_type: BindType::RowId,
            max_length: Some(max_length),
        }
    }

    pub fn with_type(mut self, bind_type: BindType) -> Self {
        if bind_type == BindType::Cursor && !matches!(self.value, BindValue::Cursor(_)) {
            self.value = BindValue::Cursor(None);
        }
        self.bind_type = bind_type;
        self
    }

    pub fn with_length(mut self, max_length: i32) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn is_cursor(&self) -> bool {
        self.bind_type == BindType::Cursor
    }
}
