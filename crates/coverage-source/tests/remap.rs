//! End-to-end tests: index a transpiled file, resolve its ignore comments and
//! remap generated ranges through a JSON source map.

use coverage_source::{
    CoverageSource, EndColumn, OriginalRange, ParserKind, SourceOptions, Span,
};
use pretty_assertions::assert_eq;
use source_map::DecodedSourceMap;
use text_size::TextSize;

const GENERATED: &str = "\
const total = add(1, 2);
// t8 ignore next
logDebug(total);
console.log(total);
";

/// A map onto `src/main.ts`, where every generated line sits one line lower
/// in the original because a type-only import was erased.
fn source_map_json() -> Vec<u8> {
    let mut builder = sourcemap::SourceMapBuilder::new(Some("main.js"));
    let tokens: &[(u32, &[u32])] = &[
        (0, &[0, 6, 14, 18, 21, 23]),
        (2, &[0, 8, 9, 14]),
        (3, &[0, 8, 12, 13, 18]),
    ];
    for &(line, columns) in tokens {
        for &column in columns {
            builder.add(line, column, line + 1, column, Some("src/main.ts"), None, false);
        }
    }
    let mut json = Vec::new();
    builder
        .into_sourcemap()
        .to_writer(&mut json)
        .expect("source map serializes");
    json
}

fn load() -> (CoverageSource, DecodedSourceMap) {
    let options = SourceOptions::from_json(r#"{"wrapperLength": 0, "parser": "ts"}"#).unwrap();
    let source = CoverageSource::with_options(GENERATED, &options).unwrap();
    let map = DecodedSourceMap::from_slice(&source_map_json()).unwrap();
    (source, map)
}

fn offset_of(needle: &str) -> u32 {
    GENERATED.find(needle).unwrap() as u32
}

#[test]
fn test_decoded_map_lists_sources() {
    let (_, map) = load();
    assert_eq!(map.sources().collect::<Vec<_>>(), vec!["src/main.ts"]);
    assert_eq!(map.len(), 15);
}

#[test]
fn test_expression_range_maps_to_original_line() {
    let (source, map) = load();
    let start = offset_of("add(");
    let end = start + "add(1, 2)".len() as u32;
    let range = source
        .offset_to_original_relative(&map, TextSize::from(start), TextSize::from(end))
        .unwrap();
    assert_eq!(
        range,
        OriginalRange {
            source: "src/main.ts".to_string(),
            start_line: 2,
            rel_start_col: 14,
            end_line: 2,
            rel_end_col: EndColumn::At(23),
        }
    );
}

#[test]
fn test_statement_at_end_of_line_is_unbounded() {
    let (source, map) = load();
    let line = source.line_at(TextSize::from(offset_of("console"))).unwrap();
    assert_eq!(line.number, 4);

    let start = line.start();
    let end = start + TextSize::from("console.log(total);".len() as u32);
    let range = source.offset_to_original_relative(&map, start, end).unwrap();
    assert_eq!(range.start_line, 5);
    assert_eq!(range.rel_start_col, 0);
    assert_eq!(range.rel_end_col, EndColumn::Unbounded);

    // Converting back in generated coordinates clamps to the line end.
    assert_eq!(
        source.relative_to_offset(4, range.rel_end_col.as_column()),
        source.eof()
    );
}

#[test]
fn test_unmapped_comment_line_is_unresolved() {
    let (source, map) = load();
    let comment = offset_of("// t8");
    assert_eq!(
        source.offset_to_original_relative(
            &map,
            TextSize::from(comment),
            TextSize::from(comment + 5)
        ),
        None
    );
}

#[test]
fn test_ignore_comment_covers_next_statement() {
    let (source, _) = load();
    let segment = Span::new(offset_of(";\n// t8") + 1, offset_of("console"));
    assert_eq!(source.ignore_segments(), &[segment]);

    assert!(source.is_offset_ignored(TextSize::from(offset_of("logDebug"))));
    assert!(!source.is_offset_ignored(TextSize::from(offset_of("console"))));
    assert!(!source.is_offset_ignored(TextSize::from(offset_of("add("))));
    // Syntax-level directives leave line state alone.
    assert!(source.lines().iter().all(|line| !line.ignored));
}

#[test]
fn test_line_directives_without_parser() {
    let text = "#!/usr/bin/env node\n/* c8 ignore next 2 */\nif (debug) {\n  trace();\n}\nrun();\n";
    let source = CoverageSource::new(text, 62);

    assert_eq!(source.shebang_length(), 19);
    assert_eq!(source.wrapper_length(), 43);
    assert!(source.ignore_segments().is_empty());

    let ignored: Vec<u32> = source
        .lines()
        .iter()
        .filter(|line| line.ignored)
        .map(|line| line.number)
        .collect();
    assert_eq!(ignored, vec![2, 3, 4]);
    assert!(!source.is_ignored(5));
    assert_eq!(source.lines().len(), 6);
    assert_eq!(source.eof(), TextSize::from(text.trim_end().len() as u32));
}

#[test]
fn test_javascript_parser_option() {
    let text = "function main() {\n  setup();\n  /* t8 ignore rest */\n  teardown();\n  exit();\n}\nmain();";
    let options = SourceOptions::new(0).with_parser(ParserKind::EcmaScript);
    let source = CoverageSource::with_options(text, &options).unwrap();

    let start = text.find("\n  /*").unwrap() as u32;
    let end = text.find("main();").unwrap() as u32;
    assert_eq!(source.ignore_segments(), &[Span::new(start, end)]);
}
