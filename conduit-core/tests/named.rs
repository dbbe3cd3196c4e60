#[cfg(test)]
mod tests {
    use conduit_core::{NamedQuery, PlaceholderStyle};
    use indoc::indoc;

    #[test]
    fn question_marks() {
        let query = NamedQuery::parse(
            "SELECT * FROM test WHERE name = :name AND (weight > :weight OR name = :name)",
            PlaceholderStyle::QuestionMark,
        );
        assert_eq!(
            query.sql(),
            "SELECT * FROM test WHERE name = ? AND (weight > ? OR name = ?)"
        );
        assert_eq!(query.slots(), ["name", "weight", "name"]);
        assert_eq!(query.positions("name").collect::<Vec<_>>(), [0, 2]);
        assert!(query.contains("weight"));
        assert!(!query.contains("id"));
        assert_eq!(
            query.to_string(),
            "SELECT * FROM test WHERE name = :name AND (weight > :weight OR name = :name)"
        );
    }

    #[test]
    fn dollars() {
        let query = NamedQuery::parse(
            "SELECT * FROM test WHERE name = :name AND (weight > :weight OR name = :name)",
            PlaceholderStyle::Dollar,
        );
        assert_eq!(
            query.sql(),
            "SELECT * FROM test WHERE name = $1 AND (weight > $2 OR name = $1)"
        );
        assert_eq!(query.slots(), ["name", "weight"]);
        assert_eq!(query.positions("name").collect::<Vec<_>>(), [0]);
    }

    #[test]
    fn untouched() {
        let sql = indoc! {r#"
            -- filter by :comment
            SELECT ':literal', "col:umn", id::text, `a:b` /* :block */
            FROM test
        "#};
        let query = NamedQuery::parse(sql, PlaceholderStyle::QuestionMark);
        assert_eq!(query.sql(), sql);
        assert!(query.slots().is_empty());

        let query = NamedQuery::parse("SET @a := :value", PlaceholderStyle::QuestionMark);
        assert_eq!(query.sql(), "SET @a := ?");
        assert_eq!(query.slots(), ["value"]);

        let query = NamedQuery::parse("SELECT 'it''s :not', :yes", PlaceholderStyle::Dollar);
        assert_eq!(query.sql(), "SELECT 'it''s :not', $1");
        assert_eq!(query.slots(), ["yes"]);

        let query = NamedQuery::parse(r"SELECT 'a\':x', :yes", PlaceholderStyle::QuestionMark);
        assert_eq!(query.slots(), ["yes"]);
    }

    #[test]
    fn dollar_quoted() {
        let query = NamedQuery::parse(
            "SELECT $fn$ :inside $fn$, $$ :also $$, :outside, $1",
            PlaceholderStyle::Dollar,
        );
        assert_eq!(query.sql(), "SELECT $fn$ :inside $fn$, $$ :also $$, $1, $1");
        assert_eq!(query.slots(), ["outside"]);
    }

    #[test]
    fn identifiers() {
        let query = NamedQuery::parse(
            "VALUES (:_a1, :b_2, :3, : c, :é)",
            PlaceholderStyle::QuestionMark,
        );
        assert_eq!(query.sql(), "VALUES (?, ?, :3, : c, :é)");
        assert_eq!(query.slots(), ["_a1", "b_2"]);
    }
}
