//! Tests for loading script tables from delimited text and reading them back.

use hokusai_core::{
    AssetCategory, AssetDirectories, CellTable, Column, Delimiter, Expression, ParamStore, Value,
};

const SCRIPT: &str = "Command,Arg1,Arg2,Arg3,Arg4,Arg5,Arg6,Text,Voice\r\n\
*intro,Introduction,,,,,,,\r\n\
Bg,room,,,,,1.5,,\r\n\
,Ann,smile,,,,,\"Hello, \"\"you\"\".\",v001\r\n\
// a note,,,,,,,,\r\n\
Wait,,,,,,oops,,\r\n";

#[test]
fn test_script_table_reads_columns_by_name() {
    let table = CellTable::from_delimited("intro.csv", SCRIPT, Delimiter::Comma).unwrap();

    assert_eq!(table.data_top_row(), 1);
    assert_eq!(table.data_rows().count(), 5);
    assert_eq!(table.try_column_index(Column::Voice.as_ref()), Some(8));

    let bg = table.row(2).unwrap();
    assert_eq!(bg.cell(Column::Command), Some("Bg"));
    assert_eq!(bg.parse_optional(Column::Arg6, 0.2f32).unwrap(), 1.5);

    let line = table.row(3).unwrap();
    assert!(line.is_empty_cell(Column::Command));
    assert_eq!(line.cell(Column::Text), Some("Hello, \"you\"."));
    assert_eq!(line.context().to_string(), "intro.csv:4");
}

#[test]
fn test_malformed_cell_reports_row_and_column() {
    let table = CellTable::from_delimited("intro.csv", SCRIPT, Delimiter::Comma).unwrap();
    let wait = table.row(5).unwrap();

    let err = wait.parse::<f32>(Column::Arg6).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("intro.csv:6"), "{}", message);
    assert!(message.contains("oops"), "{}", message);
    assert_eq!(wait.try_parse::<f32>(Column::Arg6), None);
}

#[test]
fn test_tab_delimited_table_with_header_row_offset() {
    let text = "generated sheet\nexported\tv2\nCommand\tText\nText\tone, two\n";
    let table = CellTable::from_delimited("sheet.tsv", text, Delimiter::Tab)
        .unwrap()
        .with_header_row(2);

    assert_eq!(table.data_top_row(), 3);
    let row = table.data_rows().next().unwrap();
    assert_eq!(row.cell(Column::Text), Some("one, two"));
}

#[test]
fn test_asset_directories_from_toml_keep_defaults() {
    let dirs: AssetDirectories = toml::from_str(
        r#"
root = "game"

[bg]
dir = "Backgrounds"
ext = ".png"
"#,
    )
    .unwrap();

    assert_eq!(dirs.resolve(AssetCategory::Bg, "room"), "game/Backgrounds/room.png");
    assert_eq!(dirs.resolve(AssetCategory::Se, "door"), "game/Sound/SE/door.wav");
}

#[test]
fn test_params_from_toml_drive_conditions() {
    let params: ParamStore = toml::from_str(
        r#"
x = 5
rate = 0.25
met_ann = true
name = "Ann"
"#,
    )
    .unwrap();

    assert_eq!(params.get("x"), Some(&Value::Int(5)));
    assert_eq!(params.get("rate"), Some(&Value::Float(0.25)));

    let cond = Expression::parse("met_ann && x * rate > 1").unwrap();
    assert!(cond.eval_bool(&params).unwrap());
}
