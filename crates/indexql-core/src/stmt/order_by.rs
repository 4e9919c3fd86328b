use crate::{schema::db::ColumnId, Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: ColumnId,
    pub direction: Direction,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn reverse(self) -> Direction {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" | "ASC" => Ok(Direction::Asc),
            "desc" | "DESC" => Ok(Direction::Desc),
            _ => Err(Error::invalid_argument(format!(
                "order direction must be `asc` or `desc`; got `{s}`"
            ))),
        }
    }
}
