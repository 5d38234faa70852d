use std::sync::Arc;

use readidx::{
    FieldValue, IndexCollection, LazyColumn, NA_I32, NA_I64, ParseOptions, SourceInput,
    cursor::file_column,
};
use readidx_testkit::{data_gen::generate_mixed_table, files::TempFiles};

fn open(parts: &[&str], options: &ParseOptions) -> (TempFiles, Arc<IndexCollection>) {
    let files = TempFiles::with_contents(parts).unwrap();
    let coll = IndexCollection::open(files.paths(), options).unwrap();
    (files, coll)
}

#[test]
fn test_two_file_example() {
    let (_files, coll) = open(&["a,b\n1,2\n3,4\n", "a,b\n5,6\n"], &ParseOptions::default());
    assert_eq!(coll.num_rows(), 3);
    assert_eq!(coll.num_columns(), 2);
    assert_eq!(coll.row_sizes(), vec![2, 1]);
    assert_eq!(coll.get_header(), vec!["a", "b"]);
    assert_eq!(coll.row(2), vec!["5", "6"]);
    assert_eq!(coll.get(1, 1), "4");
    assert_eq!(coll.get_column(0).to_vec(), vec!["1", "3", "5"]);

    let typed = coll.typed_column::<i32>(0);
    assert_eq!(typed.len(), 3);
    assert_eq!(typed.get(2), 5);
    assert_eq!(&*typed.materialize(), &[1, 3, 5]);
}

#[test]
fn test_get_at_file_boundaries() {
    let parts = ["v\n0\n1\n2\n", "v\n", "v\n3\n", "v\n4\n5\n"];
    let (_files, coll) = open(&parts, &ParseOptions::default());
    assert_eq!(coll.row_sizes(), vec![3, 0, 1, 2]);
    for row in 0..coll.num_rows() {
        assert_eq!(coll.get(row, 0), row.to_string());
        assert_eq!(coll.try_row(row), Some(vec![row.to_string()]));
    }
    assert_eq!(coll.try_row(coll.num_rows()), None);
}

#[test]
fn test_concatenation_law() {
    let table = generate_mixed_table(120, 0, 11);
    let parts = table.split(&[40, 0, 55, 25]);
    let (_files, coll) = open(
        &parts.iter().map(String::as_str).collect::<Vec<_>>(),
        &ParseOptions::default(),
    );

    let mut expected = Vec::new();
    for index in coll.file_indexes() {
        for row in 0..index.num_rows() {
            expected.push(index.get_row(row));
        }
    }
    let actual = (0..coll.num_rows()).map(|r| coll.row(r)).collect::<Vec<_>>();
    assert_eq!(actual, expected);
    assert_eq!(actual, table.rows);

    for col in 0..coll.num_columns() {
        let mut per_file = Vec::new();
        for index in coll.file_indexes() {
            per_file.extend(file_column(index, col).to_vec());
        }
        assert_eq!(coll.get_column(col).to_vec(), per_file);
    }
}

#[test]
fn test_column_slicing() {
    let table = generate_mixed_table(30, 0, 5);
    let parts = table.split(&[10, 7, 13]);
    let (_files, coll) = open(
        &parts.iter().map(String::as_str).collect::<Vec<_>>(),
        &ParseOptions::default(),
    );
    let col = coll.get_column(3);
    assert_eq!(col.len(), 30);
    for (a, b) in [(0, 30), (5, 12), (9, 11), (17, 17), (29, 30)] {
        let slice = col.slice(a, b);
        assert_eq!(slice.len(), b - a);
        for i in 0..slice.len() {
            assert_eq!(slice.get(i), col.get(a + i));
            assert_eq!(slice.get(i), table.rows[a + i][3]);
        }
    }
    let reversed = col.slice(8, 12).iter().rev().collect::<Vec<_>>();
    let expected = (8..12).rev().map(|r| table.rows[r][3].clone()).collect::<Vec<_>>();
    assert_eq!(reversed, expected);
}

#[test]
fn test_column_outlives_collection() {
    let (_files, coll) = open(&["a\nx\ny\n"], &ParseOptions::default());
    let col = coll.get_column(0);
    let typed = coll.typed_column::<f64>(0);
    drop(coll);
    assert_eq!(col.to_vec(), vec!["x", "y"]);
    assert_eq!(typed.missing_count(), 2);
}

fn expected_f64(token: &str) -> Option<f64> {
    if token == "NA" { None } else { token.parse().ok() }
}

#[test]
fn test_typed_columns_of_generated_table() {
    let table = generate_mixed_table(500, 6, 42);
    let parts = table.split(&[200, 300]);
    for threads in [1, 3] {
        let options = ParseOptions::default().with_num_threads(threads);
        let (_files, coll) = open(
            &parts.iter().map(String::as_str).collect::<Vec<_>>(),
            &options,
        );

        let x: LazyColumn<f64> = coll.typed_column(1);
        let n: LazyColumn<i32> = coll.typed_column(2);
        let singles = (0..x.len()).map(|i| x.get(i).to_bits()).collect::<Vec<_>>();
        let materialized = x.materialize();
        assert_eq!(
            materialized.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
            singles
        );

        let n_singles = (0..n.len()).map(|i| n.get(i)).collect::<Vec<_>>();
        assert!(!n.is_materialized());
        let n_all = n.materialize();
        assert_eq!(&*n_all, n_singles.as_slice());

        let wide: LazyColumn<i64> = coll.typed_column(2);
        let wide_singles = (0..wide.len()).map(|i| wide.get(i)).collect::<Vec<_>>();
        assert!(!wide.is_materialized());
        let wide_all = wide.materialize();
        assert_eq!(&*wide_all, wide_singles.as_slice());

        for (row, values) in table.rows.iter().enumerate() {
            match expected_f64(&values[1]) {
                Some(v) => assert_eq!(materialized[row], v, "row {row}"),
                None => assert!(materialized[row].is_missing(), "row {row}"),
            }
            let expected_n = values[2].parse::<i32>().unwrap_or(NA_I32);
            assert_eq!(n_singles[row], expected_n, "row {row}");
            assert_eq!(n_all[row], expected_n, "row {row}");
            let expected_wide = values[2].parse::<i64>().unwrap_or(NA_I64);
            assert_eq!(wide_singles[row], expected_wide, "row {row}");
            assert_eq!(wide_all[row], expected_wide, "row {row}");
        }
        assert!(x.missing_count() > 0);
        assert!(n.missing_count() > 0);
    }
}

#[test]
fn test_in_memory_sources() {
    let inputs = vec![
        SourceInput::new(
            "first",
            readidx_io::share(readidx_io::memory::NamedBuffer::new("first", "1;2\n")),
        ),
        SourceInput::new(
            "second",
            readidx_io::share(readidx_io::memory::NamedBuffer::new("second", "3;x\n")),
        ),
    ];
    let options = ParseOptions::default()
        .with_delimiter(';')
        .with_header(false);
    let coll = IndexCollection::new(inputs, &options).unwrap();
    assert_eq!(coll.filenames(), vec!["first", "second"]);
    assert_eq!(coll.get_header(), vec!["X1", "X2"]);
    let second = coll.typed_column::<i64>(1);
    assert_eq!(second.get(0), 2);
    assert!(second.get(1).is_missing());
}

#[test]
fn test_ragged_file_is_rejected() {
    let files = TempFiles::with_contents(&["a,b\n1,2\n3\n"]).unwrap();
    let err = IndexCollection::open(files.paths(), &ParseOptions::default()).unwrap_err();
    assert!(err.is_format_error());
    assert!(err.to_string().contains("part_0.csv:3"), "{err}");
}

#[test]
fn test_missing_file() {
    let files = TempFiles::new().unwrap();
    let path = files.dir().join("absent.csv");
    assert!(IndexCollection::open(&[path], &ParseOptions::default()).is_err());
}
