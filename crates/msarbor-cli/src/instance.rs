//! Text instance format.
//!
//! The first token is the node count `n`; the root is `n - 1`. It is followed by `n` rows, one
//! per tail `0..n`, each with `n - 1` costs for heads `0..n - 1`. The entry where tail equals
//! head is read and ignored. Costs at or above [`msarbor::NO_ARC`] mark missing arcs.

use msarbor::{Cost, CostMatrix};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    MissingNodeCount,
    InvalidNodeCount(String),
    MissingCost { tail: usize, head: usize },
    InvalidCost { tail: usize, head: usize, token: String },
    TrailingInput(String),
    Instance(msarbor::Error),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MissingNodeCount => write!(f, "missing node count"),
            ParseError::InvalidNodeCount(token) => write!(f, "invalid node count `{token}`"),
            ParseError::MissingCost { tail, head } => {
                write!(f, "missing cost for arc ({tail}, {head})")
            }
            ParseError::InvalidCost { tail, head, token } => {
                write!(f, "invalid cost `{token}` for arc ({tail}, {head})")
            }
            ParseError::TrailingInput(token) => {
                write!(f, "unexpected input after the cost table: `{token}`")
            }
            ParseError::Instance(err) => write!(f, "{err}"),
        }
    }
}

impl From<msarbor::Error> for ParseError {
    fn from(value: msarbor::Error) -> Self {
        Self::Instance(value)
    }
}

pub fn parse_instance(text: &str) -> Result<CostMatrix, ParseError> {
    let mut tokens = text.split_whitespace();

    let n_token = tokens.next().ok_or(ParseError::MissingNodeCount)?;
    let n = n_token
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidNodeCount(n_token.to_string()))?;
    if n == 0 {
        return Err(msarbor::Error::EmptyGraph.into());
    }

    // Backward-star layout: entry `head * n + tail`.
    let mut stars: Vec<Cost> = vec![0; n * (n - 1)];
    for tail in 0..n {
        for head in 0..n - 1 {
            let token = tokens.next().ok_or(ParseError::MissingCost { tail, head })?;
            let cost = token.parse::<Cost>().map_err(|_| ParseError::InvalidCost {
                tail,
                head,
                token: token.to_string(),
            })?;
            if tail != head {
                stars[head * n + tail] = cost;
            }
        }
    }

    if let Some(extra) = tokens.next() {
        return Err(ParseError::TrailingInput(extra.to_string()));
    }

    Ok(CostMatrix::from_raw_backward_stars(n, &stars)?)
}

#[cfg(test)]
mod tests {
    use super::{ParseError, parse_instance};
    use msarbor::NO_ARC;

    #[test]
    fn parses_rows_by_tail() {
        let m = parse_instance("3\n0 2\n5 0\n4 3\n").unwrap();
        assert_eq!(m.node_count(), 3);
        assert_eq!(m.get(0, 1), Some(2));
        assert_eq!(m.get(1, 0), Some(5));
        assert_eq!(m.get(2, 0), Some(4));
        assert_eq!(m.get(2, 1), Some(3));
    }

    #[test]
    fn sentinel_costs_are_missing_arcs() {
        let text = format!("3 0 {NO_ARC} 1 0 4 3");
        let m = parse_instance(&text).unwrap();
        assert_eq!(m.get(0, 1), None);
        assert_eq!(m.get(1, 0), Some(1));
    }

    #[test]
    fn reports_the_first_missing_cost() {
        assert_eq!(
            parse_instance("3 0 2 5"),
            Err(ParseError::MissingCost { tail: 1, head: 1 })
        );
    }

    #[test]
    fn rejects_garbage_and_leftovers() {
        assert_eq!(
            parse_instance("two"),
            Err(ParseError::InvalidNodeCount("two".to_string()))
        );
        assert_eq!(
            parse_instance("2 0 x"),
            Err(ParseError::InvalidCost {
                tail: 1,
                head: 0,
                token: "x".to_string()
            })
        );
        assert_eq!(
            parse_instance("2 0 7 9"),
            Err(ParseError::TrailingInput("9".to_string()))
        );
        assert_eq!(parse_instance(""), Err(ParseError::MissingNodeCount));
    }

    #[test]
    fn single_node_has_no_costs() {
        let m = parse_instance("1").unwrap();
        assert_eq!(m.node_count(), 1);
    }
}
