#[cfg(test)]
mod tests {
    use quill_core::{Parameters, Statement, Value, truncated};

    #[test]
    fn bind_fresh_names() {
        let mut parameters = Parameters::new();
        assert_eq!(parameters.bind("age", Value::Int32(1)), "age_0");
        assert_eq!(parameters.bind("age", Value::Int32(2)), "age_1");
        assert_eq!(parameters.bind("name", Value::Null), "name_0");
        parameters.insert("age_2", Value::Int32(3));
        assert_eq!(parameters.bind("age", Value::Int32(4)), "age_3");
        assert_eq!(
            parameters.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            ["age_0", "age_1", "name_0", "age_2", "age_3"]
        );
        assert_eq!(parameters.get("age_1"), Some(&Value::Int32(2)));
        assert!(!parameters.contains("age_4"));
    }

    #[test]
    fn extend_and_collect() {
        let mut parameters: Parameters = [("id", Value::Int64(1))].into_iter().collect();
        parameters.extend([("id", Value::Int64(2)), ("name", Value::Null)].into_iter().collect());
        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters.get("id"), Some(&Value::Int64(2)));
        let names: Vec<String> = parameters.into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["id", "name"]);
    }

    #[test]
    fn statement_display() {
        let statement = Statement::from("SELECT 1");
        assert!(statement.parameters.is_empty());
        assert_eq!(statement.to_string(), "SELECT 1");
        let long = format!("SELECT {}", "x, ".repeat(300));
        let shown = Statement::from(long).to_string();
        assert!(shown.len() <= 500);
        assert!(shown.ends_with("..."));
        assert_eq!(truncated("héllo", 2), "h");
    }
}
