//! Inline SVG icons looked up by name.

use std::collections::HashMap;

use tera::Value;

/// SVG path data for a named icon.
pub fn icon_path(name: &str) -> Option<&'static str> {
    let d = match name {
        "home" => "M3 9l9-7 9 7v11a2 2 0 01-2 2H5a2 2 0 01-2-2z M9 22V12h6v10",
        "doctors" => "M20.84 4.61a5.5 5.5 0 00-7.78 0L12 5.67l-1.06-1.06a5.5 5.5 0 00-7.78 7.78l1.06 1.06L12 21.23l7.78-7.78 1.06-1.06a5.5 5.5 0 000-7.78z",
        "appts" => "M8 6h13M8 12h13M8 18h13M3 6h.01M3 12h.01M3 18h.01",
        "rx" => "M9 3H5a2 2 0 00-2 2v4m6-6h10a2 2 0 012 2v4M9 3v18m0 0h10a2 2 0 002-2V9M9 21H5a2 2 0 01-2-2V9m0 0h18",
        "billing" => "M12 2v20M17 5H9.5a3.5 3.5 0 000 7h5a3.5 3.5 0 010 7H6",
        "logout" => "M9 21H5a2 2 0 01-2-2V5a2 2 0 012-2h4 M16 17l5-5-5-5 M21 12H9",
        "download" => "M21 15v4a2 2 0 01-2 2H5a2 2 0 01-2-2v-4 M7 10l5 5 5-5 M12 15V3",
        _ => return None,
    };
    Some(d)
}

/// Template function `icon_path(name=..)`; unknown names give an empty string.
pub(super) fn icon_path_function(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let name = args.get("name").and_then(Value::as_str).unwrap_or_default();
    Ok(Value::from(icon_path(name).unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_lookup() {
        assert!(icon_path("download").is_some_and(|d| d.contains("M12 15V3")));
        assert_eq!(icon_path("stethoscope"), None);
    }

    #[test]
    fn test_icon_path_function() {
        let mut args = HashMap::new();
        args.insert("name".to_string(), Value::from("rx"));
        assert_eq!(
            icon_path_function(&args).unwrap(),
            Value::from(icon_path("rx").unwrap())
        );

        args.insert("name".to_string(), Value::from("stethoscope"));
        assert_eq!(icon_path_function(&args).unwrap(), Value::from(""));
        assert_eq!(icon_path_function(&HashMap::new()).unwrap(), Value::from(""));
    }
}
