use std::fmt;

/// Tables the client reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Posts,
    Likes,
    Comments,
    Profiles,
    Pokemon,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Posts => "posts",
            Table::Likes => "likes",
            Table::Comments => "comments",
            Table::Profiles => "profiles",
            Table::Pokemon => "pokemon",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equality filter on one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// Description of a row-store read.
///
/// `columns` uses the backend's select syntax, so related tables can be
/// embedded: `*,likes(user_id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    pub columns: String,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    /// Expect exactly one row.
    pub single: bool,
}

impl Default for SelectQuery {
    fn default() -> Self {
        Self {
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            single: false,
        }
    }
}

impl SelectQuery {
    /// `select *` with no filter or order.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.into(),
            ascending,
        });
        self
    }

    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }
}
