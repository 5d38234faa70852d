//! Data generation utilities for testing.
//!
//! All generators are deterministic for a given seed, so tests can compare the
//! indexed values against the rows that produced them.

/// A generated delimited text table: the rendered text plus the source rows.
pub struct GeneratedTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub text: String,
}

impl GeneratedTable {
    /// Splits the rows into consecutive parts of the given sizes, each rendered
    /// with its own copy of the header.
    ///
    /// # Panics
    ///
    /// Panics if the sizes do not add up to the number of rows.
    pub fn split(&self, sizes: &[usize]) -> Vec<String> {
        assert_eq!(sizes.iter().sum::<usize>(), self.rows.len());
        let mut parts = Vec::with_capacity(sizes.len());
        let mut start = 0;
        for &size in sizes {
            parts.push(render(&self.header, &self.rows[start..start + size]));
            start += size;
        }
        parts
    }
}

/// Generates `rows` records with an `id` column, a floating-point column `x`, an
/// integer column `n` and a free-text column `label`. Rows hold the values as a
/// reader should decode them; the rendered text quotes labels containing commas.
///
/// About one value in `1 / malformed_every` of the numeric columns is replaced by
/// a token that does not parse (`NA`, an empty field, `abc`, or an integer outside
/// the 32-bit range); pass 0 to disable this.
pub fn generate_mixed_table(rows: usize, malformed_every: u32, seed: u64) -> GeneratedTable {
    let mut rng = fastrand::Rng::with_seed(seed);
    let header = ["id", "x", "n", "label"].map(String::from).to_vec();
    let mut out = Vec::with_capacity(rows);
    for id in 0..rows {
        let mut x = format!("{:.3}", rng.f64() * 2000.0 - 1000.0);
        let mut n = rng.i32(-100_000..100_000).to_string();
        if malformed_every > 0 && rng.u32(0..malformed_every) == 0 {
            x = malformed_token(&mut rng).to_string();
        }
        if malformed_every > 0 && rng.u32(0..malformed_every) == 0 {
            n = malformed_token(&mut rng).to_string();
        }
        let label = if rng.bool() {
            format!("label, {id}")
        } else {
            format!("label_{id}")
        };
        out.push(vec![id.to_string(), x, n, label]);
    }
    let text = render(&header, &out);
    GeneratedTable {
        header,
        rows: out,
        text,
    }
}

fn malformed_token(rng: &mut fastrand::Rng) -> &'static str {
    match rng.u32(0..4) {
        0 => "NA",
        1 => "",
        2 => "abc",
        _ => "99999999999999",
    }
}

fn render(header: &[String], rows: &[Vec<String>]) -> String {
    let mut text = header.join(",");
    text.push('\n');
    for row in rows {
        let fields = row.iter().map(|f| quote_if_needed(f)).collect::<Vec<_>>();
        text.push_str(&fields.join(","));
        text.push('\n');
    }
    text
}

fn quote_if_needed(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
