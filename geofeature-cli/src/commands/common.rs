//! Argument parsers and formatting shared across CLI commands.

use geofeature::geometry::{PointD, Triangle};
use geofeature::taxonomy::{Taxonomy, TypeCode};

/// Parse `X,Y` into a point.
pub fn parse_point(s: &str) -> Result<PointD, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{s}'"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|_| format!("'{}' is not a number", v.trim()))
    };
    Ok(PointD::new(coord(x)?, coord(y)?))
}

/// Parse `X,Y;X,Y;X,Y` into a triangle.
pub fn parse_triangle(s: &str) -> Result<Triangle, String> {
    let vertices = s
        .split(';')
        .map(parse_point)
        .collect::<Result<Vec<_>, _>>()?;
    match vertices.as_slice() {
        [a, b, c] => Ok(Triangle::new(*a, *b, *c)),
        _ => Err(format!(
            "expected three vertices separated by ';' but got {}",
            vertices.len()
        )),
    }
}

/// Readable name of a type code: its dotted path when the taxonomy knows it,
/// the raw node indices otherwise.
pub fn type_label(code: TypeCode, taxonomy: Option<&Taxonomy>) -> String {
    taxonomy
        .and_then(|t| t.path_of(code))
        .unwrap_or_else(|| code.to_string())
}
