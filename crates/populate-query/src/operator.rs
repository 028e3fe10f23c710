use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    Ne,
    In,
    Nin,
    Exists,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Operator {
    /// Map a Mongo-style `$op` key to an operator.
    pub fn from_mongo(key: &str) -> Option<Self> {
        let op = match key {
            "$eq" => Operator::Eq,
            "$ne" => Operator::Ne,
            "$in" => Operator::In,
            "$nin" => Operator::Nin,
            "$exists" => Operator::Exists,
            "$gt" => Operator::Gt,
            "$gte" => Operator::Gte,
            "$lt" => Operator::Lt,
            "$lte" => Operator::Lte,
            _ => return None,
        };
        Some(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_operator_has_a_mongo_key() {
        let pairs = [
            ("$eq", Operator::Eq),
            ("$ne", Operator::Ne),
            ("$in", Operator::In),
            ("$nin", Operator::Nin),
            ("$exists", Operator::Exists),
            ("$gt", Operator::Gt),
            ("$gte", Operator::Gte),
            ("$lt", Operator::Lt),
            ("$lte", Operator::Lte),
        ];
        for (key, operator) in pairs {
            assert_eq!(Operator::from_mongo(key), Some(operator));
        }
        assert_eq!(Operator::from_mongo("$regex"), None);
    }
}
