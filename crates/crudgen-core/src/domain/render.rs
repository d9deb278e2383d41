//! Go source rendering for [`TestFile`] blueprints.
//!
//! Output follows gofmt layout: tab indentation, aligned struct fields and
//! aligned keyed values in single-line runs of a composite literal. The
//! import block is derived from the package qualifiers the rendered body
//! actually uses.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::entities::blueprint::{
    Decl, MockMethod, MockType, ScenarioRow, Stmt, TableTest, TestFile, TestFunc, Value,
};

static QUALIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([a-z][a-z0-9]*)\.[A-Z]").expect("qualifier pattern is valid")
});

/// Packages a generated test may reference, keyed by qualifier.
const STD_IMPORTS: &[(&str, &str)] = &[
    ("context", "context"),
    ("errors", "errors"),
    ("http", "net/http"),
    ("httptest", "net/http/httptest"),
    ("json", "encoding/json"),
    ("testing", "testing"),
];

const THIRD_PARTY_IMPORTS: &[(&str, &str)] = &[
    ("assert", "github.com/stretchr/testify/assert"),
    ("fiber", "github.com/gofiber/fiber/v2"),
    ("mock", "github.com/stretchr/testify/mock"),
    ("require", "github.com/stretchr/testify/require"),
    ("uuid", "github.com/google/uuid"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct GoRenderer;

impl GoRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, file: &TestFile) -> String {
        let mut body = String::new();
        for decl in &file.decls {
            body.push('\n');
            match decl {
                Decl::Mock(mock) => write_mock(&mut body, mock),
                Decl::Test(test) => write_test(&mut body, test),
            }
        }

        let mut out = format!("package {}\n", file.package);
        write_imports(&mut out, &used_imports(&body, file));
        out.push_str(&body);
        out
    }
}

// ── Imports ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ImportLine {
    path: String,
    blank: bool,
}

struct ImportBlock {
    std: BTreeSet<ImportLine>,
    third_party: BTreeSet<ImportLine>,
}

fn used_imports(body: &str, file: &TestFile) -> ImportBlock {
    let qualifiers: BTreeSet<&str> = QUALIFIER
        .captures_iter(body)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();

    let pick = |table: &[(&str, &str)]| -> BTreeSet<ImportLine> {
        table
            .iter()
            .filter(|(q, _)| qualifiers.contains(q))
            .map(|(_, path)| ImportLine {
                path: (*path).to_string(),
                blank: false,
            })
            .collect()
    };

    let std = pick(STD_IMPORTS);
    let mut third_party = pick(THIRD_PARTY_IMPORTS);
    if qualifiers.contains("enttest") {
        third_party.insert(ImportLine {
            path: format!("{}/ent/enttest", file.module_path),
            blank: false,
        });
    }
    third_party.extend(file.blank_imports.iter().map(|path| ImportLine {
        path: path.clone(),
        blank: true,
    }));

    ImportBlock { std, third_party }
}

fn write_imports(out: &mut String, block: &ImportBlock) {
    if block.std.is_empty() && block.third_party.is_empty() {
        return;
    }
    out.push_str("\nimport (\n");
    let groups = [&block.std, &block.third_party];
    let mut first = true;
    for group in groups.into_iter().filter(|g| !g.is_empty()) {
        if !first {
            out.push('\n');
        }
        first = false;
        for import in group {
            let prefix = if import.blank { "_ " } else { "" };
            let _ = writeln!(out, "\t{prefix}\"{}\"", import.path);
        }
    }
    out.push_str(")\n");
}

// ── Declarations ─────────────────────────────────────────────────────────────

fn write_mock(out: &mut String, mock: &MockType) {
    let _ = writeln!(out, "type {} struct {{\n\tmock.Mock\n}}", mock.name);
    for method in &mock.methods {
        out.push('\n');
        write_mock_method(out, mock, method);
    }
}

fn write_mock_method(out: &mut String, mock: &MockType, method: &MockMethod) {
    let recv = mock.receiver();
    let params = method
        .params
        .iter()
        .map(|p| format!("{} {}", p.name, p.ty))
        .collect::<Vec<_>>()
        .join(", ");
    let results = match method.results.as_slice() {
        [] => String::new(),
        [single] => format!(" {single}"),
        many => format!(" ({})", many.join(", ")),
    };
    let _ = writeln!(
        out,
        "func ({recv} *{}) {}({params}){results} {{",
        mock.name, method.name
    );

    let args = method
        .params
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "\targs := {recv}.Called({args})");

    let last = method.results.len().saturating_sub(1);
    let returns = method
        .results
        .iter()
        .enumerate()
        .map(|(i, ty)| {
            if i == last && ty == "error" {
                format!("args.Error({i})")
            } else {
                format!("args.Get({i}).({ty})")
            }
        })
        .collect::<Vec<_>>();

    if let [first, second] = method.results.as_slice() {
        if second == "error" && is_nilable(first) {
            out.push_str("\tif args.Get(0) == nil {\n\t\treturn nil, args.Error(1)\n\t}\n");
        }
    }
    if !returns.is_empty() {
        let _ = writeln!(out, "\treturn {}", returns.join(", "));
    }
    out.push_str("}\n");
}

fn is_nilable(ty: &str) -> bool {
    ty.starts_with('*') || ty.starts_with("[]") || ty.starts_with("map[")
}

fn write_test(out: &mut String, test: &TestFunc) {
    let _ = writeln!(out, "func {}(t *testing.T) {{", test.name);
    write_stmts(out, &test.body, 1);
    out.push_str("}\n");
}

// ── Statements ───────────────────────────────────────────────────────────────

fn indent(out: &mut String, depth: usize) {
    out.extend(std::iter::repeat_n('\t', depth));
}

fn write_stmts(out: &mut String, stmts: &[Stmt], depth: usize) {
    for stmt in stmts {
        match stmt {
            Stmt::Blank => out.push('\n'),
            Stmt::Line(line) => {
                indent(out, depth);
                out.push_str(line);
                out.push('\n');
            }
            Stmt::Block { open, body, close } => {
                indent(out, depth);
                let _ = writeln!(out, "{open} {{");
                write_stmts(out, body, depth + 1);
                indent(out, depth);
                out.push_str(close);
                out.push('\n');
            }
            Stmt::Table(table) => write_table(out, table, depth),
        }
    }
}

fn write_table(out: &mut String, table: &TableTest, depth: usize) {
    indent(out, depth);
    out.push_str("tests := []struct {\n");
    let width = table.fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
    for field in &table.fields {
        indent(out, depth + 1);
        let _ = writeln!(out, "{:<width$} {}", field.name, field.ty);
    }
    indent(out, depth);
    out.push_str("}{\n");
    for row in &table.rows {
        write_row(out, row, depth + 1);
    }
    indent(out, depth);
    out.push_str("}\n\n");

    indent(out, depth);
    out.push_str("for _, tt := range tests {\n");
    indent(out, depth + 1);
    out.push_str("t.Run(tt.name, func(t *testing.T) {\n");
    write_stmts(out, &table.runner, depth + 2);
    indent(out, depth + 1);
    out.push_str("})\n");
    indent(out, depth);
    out.push_str("}\n");
}

fn write_row(out: &mut String, row: &ScenarioRow, depth: usize) {
    indent(out, depth);
    out.push_str("{\n");

    // Single-line entries align in runs; a function literal ends a run.
    let mut run: Vec<(&str, &str)> = Vec::new();
    for (key, value) in &row.entries {
        match value {
            Value::Expr(expr) => run.push((key, expr)),
            Value::Func { signature, body } => {
                flush_run(out, &mut run, depth + 1);
                indent(out, depth + 1);
                let _ = writeln!(out, "{key}: {signature} {{");
                write_stmts(out, body, depth + 2);
                indent(out, depth + 1);
                out.push_str("},\n");
            }
        }
    }
    flush_run(out, &mut run, depth + 1);

    indent(out, depth);
    out.push_str("},\n");
}

fn flush_run(out: &mut String, run: &mut Vec<(&str, &str)>, depth: usize) {
    let width = run.iter().map(|(k, _)| k.len() + 1).max().unwrap_or(0);
    for (key, expr) in run.drain(..) {
        indent(out, depth);
        let _ = writeln!(out, "{:<width$} {expr},", format!("{key}:"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::blueprint::{MockMethod, ScenarioRow};

    fn render(file: &TestFile) -> String {
        GoRenderer::new().render(file)
    }

    #[test]
    fn renders_package_and_only_used_imports() {
        let file = TestFile::new("recipes", "freshease/backend").test(
            TestFunc::new("TestThing").line(r#"assert.Equal(t, 1, 1)"#),
        );
        let out = render(&file);
        assert!(out.starts_with("package recipes\n\nimport (\n\t\"testing\"\n\n"));
        assert!(out.contains("\t\"github.com/stretchr/testify/assert\"\n)"));
        assert!(!out.contains("require"));
        assert!(!out.contains("\"context\""));
    }

    #[test]
    fn local_selectors_are_not_imports() {
        let file = TestFile::new("x", "m").test(
            TestFunc::new("TestX")
                .line("args := m.Called(ctx)")
                .line("_ = tt.Name"),
        );
        let out = render(&file);
        assert!(!out.contains("\"m\""));
        assert!(!out.contains("\"tt\""));
    }

    #[test]
    fn enttest_and_blank_imports_sorted_by_path() {
        let file = TestFile::new("recipes", "freshease/backend")
            .blank_import("github.com/mattn/go-sqlite3")
            .test(
                TestFunc::new("TestEntRepo_List")
                    .line(r#"client := enttest.Open(t, "sqlite3", "x")"#)
                    .line("_ = uuid.New()")
                    .line("require.NoError(t, nil)"),
            );
        let out = render(&file);
        let block = "\t\"freshease/backend/ent/enttest\"\n\
                     \t\"github.com/google/uuid\"\n\
                     \t_ \"github.com/mattn/go-sqlite3\"\n\
                     \t\"github.com/stretchr/testify/require\"\n";
        assert!(out.contains(block), "{out}");
    }

    #[test]
    fn mock_method_with_nil_guard() {
        let mock = MockType::new("MockRepository").method(
            MockMethod::new("List")
                .param("ctx", "context.Context")
                .returns("[]*GetRecipeDTO")
                .returns("error"),
        );
        let out = render(&TestFile::new("recipes", "m").mock(mock));
        let expected = "\
func (m *MockRepository) List(ctx context.Context) ([]*GetRecipeDTO, error) {
\targs := m.Called(ctx)
\tif args.Get(0) == nil {
\t\treturn nil, args.Error(1)
\t}
\treturn args.Get(0).([]*GetRecipeDTO), args.Error(1)
}
";
        assert!(out.contains("type MockRepository struct {\n\tmock.Mock\n}\n"));
        assert!(out.contains(expected), "{out}");
    }

    #[test]
    fn error_only_method() {
        let mock = MockType::new("MockService").method(
            MockMethod::new("Delete")
                .param("ctx", "context.Context")
                .param("id", "uuid.UUID")
                .returns("error"),
        );
        let out = render(&TestFile::new("x", "m").mock(mock));
        assert!(out.contains(
            "func (m *MockService) Delete(ctx context.Context, id uuid.UUID) error {\n\
             \targs := m.Called(ctx, id)\n\
             \treturn args.Error(0)\n}\n"
        ));
    }

    #[test]
    fn table_fields_and_values_are_aligned() {
        let table = TableTest::new()
            .field("name", "string")
            .field("mockSetup", "func(*MockService)")
            .field("expectedStatus", "int")
            .row(
                ScenarioRow::new()
                    .set("name", r#""success""#)
                    .func(
                        "mockSetup",
                        "func(m *MockService)",
                        vec![Stmt::line("m.On(\"List\")")],
                    )
                    .set("expectedStatus", "http.StatusOK"),
            )
            .runner(vec![Stmt::line("_ = tt")]);
        let out = render(&TestFile::new("x", "m").test(TestFunc::new("TestX").stmt(Stmt::Table(table))));

        assert!(out.contains("\t\tname           string\n"));
        assert!(out.contains("\t\tmockSetup      func(*MockService)\n"));
        assert!(out.contains("\t\texpectedStatus int\n"));
        assert!(out.contains("\t\t\tname: \"success\",\n"));
        assert!(out.contains("\t\t\tmockSetup: func(m *MockService) {\n\t\t\t\tm.On(\"List\")\n\t\t\t},\n"));
        assert!(out.contains("\t\t\texpectedStatus: http.StatusOK,\n"));
        assert!(out.contains("\tfor _, tt := range tests {\n\t\tt.Run(tt.name, func(t *testing.T) {\n\t\t\t_ = tt\n\t\t})\n\t}\n"));
    }

    #[test]
    fn keyed_run_alignment() {
        let table = TableTest::new().field("name", "string").row(
            ScenarioRow::new()
                .set("expectedStatus", "200")
                .set("expectedMessage", r#""ok""#),
        );
        let out = render(&TestFile::new("x", "m").test(TestFunc::new("TestX").stmt(Stmt::Table(table))));
        assert!(out.contains("\t\t\texpectedStatus:  200,\n\t\t\texpectedMessage: \"ok\",\n"));
    }

    #[test]
    fn block_statement() {
        let test = TestFunc::new("TestX").stmt(Stmt::block(
            "if err != nil",
            vec![Stmt::line("t.Fatal(err)")],
            "}",
        ));
        let out = render(&TestFile::new("x", "m").test(test));
        assert!(out.contains("\tif err != nil {\n\t\tt.Fatal(err)\n\t}\n"));
    }
}
