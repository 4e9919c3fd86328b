use super::Expr;
use crate::schema::db::ColumnId;

/// Substring match on a text column. The needle is matched literally; the
/// serializer escapes pattern metacharacters.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprLike {
    pub column: ColumnId,
    pub like: Like,
    pub needle: String,
    pub negated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Like {
    Contains,
    StartsWith,
    EndsWith,
}

impl ExprLike {
    /// Builds the `LIKE` pattern, escaping `\`, `%` and `_` with `\`.
    pub fn pattern(&self) -> String {
        let mut escaped = String::with_capacity(self.needle.len() + 2);

        for c in self.needle.chars() {
            if matches!(c, '\\' | '%' | '_') {
                escaped.push('\\');
            }
            escaped.push(c);
        }

        match self.like {
            Like::Contains => format!("%{escaped}%"),
            Like::StartsWith => format!("{escaped}%"),
            Like::EndsWith => format!("%{escaped}"),
        }
    }
}

impl Expr {
    pub fn like(column: ColumnId, like: Like, needle: impl Into<String>, negated: bool) -> Self {
        ExprLike {
            column,
            like,
            needle: needle.into(),
            negated,
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::db::TableId;

    fn like(like: Like, needle: &str) -> ExprLike {
        ExprLike {
            column: ColumnId {
                table: TableId(0),
                index: 0,
            },
            like,
            needle: needle.to_string(),
            negated: false,
        }
    }

    #[test]
    fn pattern_wraps_needle() {
        assert_eq!(like(Like::Contains, "abc").pattern(), "%abc%");
        assert_eq!(like(Like::StartsWith, "abc").pattern(), "abc%");
        assert_eq!(like(Like::EndsWith, "abc").pattern(), "%abc");
    }

    #[test]
    fn pattern_escapes_metacharacters() {
        assert_eq!(like(Like::Contains, "50%_off\\").pattern(), "%50\\%\\_off\\\\%");
    }
}
