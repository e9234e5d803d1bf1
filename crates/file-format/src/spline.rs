use coaster_kernel::{ControlPointTransform, Point3d, Vec3};

use crate::errors::LoadError;

/// Parse a spline file into its per-point deltas.
///
/// Each non-blank line holds three numbers separated by whitespace or commas.
/// Anything after `#` is a comment.
pub fn parse_deltas(text: &str) -> Result<Vec<Vec3>, LoadError> {
    let mut deltas = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }

        let fields: Vec<&str> = content
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect();
        let [x, y, z] = fields.as_slice() else {
            return Err(LoadError::Syntax {
                line,
                message: format!("expected 3 coordinates, found {}", fields.len()),
            });
        };

        let coordinate = |field: &str| -> Result<f64, LoadError> {
            let value: f64 = field.parse().map_err(|_| LoadError::Syntax {
                line,
                message: format!("`{field}` is not a number"),
            })?;
            if value.is_finite() {
                Ok(value)
            } else {
                Err(LoadError::Syntax {
                    line,
                    message: format!("`{field}` is not finite"),
                })
            }
        };
        deltas.push(Vec3::new(coordinate(*x)?, coordinate(*y)?, coordinate(*z)?));
    }

    if deltas.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(deltas)
}

/// Parse a spline file and place its points with `transform`.
pub fn parse_control_points(
    text: &str,
    transform: &ControlPointTransform,
) -> Result<Vec<Point3d>, LoadError> {
    Ok(transform.apply(&parse_deltas(text)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_separators_and_comments() {
        let text = "# a small hill\n0 0 1\n\n1.5, 0.5, 1   # climb\n  -1\t0\t2\n";
        let deltas = parse_deltas(text).unwrap();
        assert_eq!(
            deltas,
            vec![
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(1.5, 0.5, 1.0),
                Vec3::new(-1.0, 0.0, 2.0),
            ]
        );
    }

    #[test]
    fn test_wrong_field_count_reports_line() {
        let err = parse_deltas("0 0 1\n\n1 2\n").unwrap_err();
        match err {
            LoadError::Syntax { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("found 2"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_number_reports_line() {
        let err = parse_deltas("0 0 1\n0 x 1\n").unwrap_err();
        assert!(matches!(err, LoadError::Syntax { line: 2, .. }));
        let err = parse_deltas("inf 0 0\n").unwrap_err();
        assert!(matches!(err, LoadError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_empty_file_rejected() {
        assert!(matches!(parse_deltas("# nothing\n\n"), Err(LoadError::Empty)));
    }

    #[test]
    fn test_parse_control_points_applies_transform() {
        let points = parse_control_points("1 0 0\n1 0 0\n", &ControlPointTransform::default()).unwrap();
        assert_eq!(points[0], Point3d::new(-2.0, 0.0, -9.0));
        assert_eq!(points[1], Point3d::new(0.0, 0.0, -9.0));
    }
}
