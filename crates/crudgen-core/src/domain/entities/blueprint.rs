//! Structured form of a Go test file before it is rendered to text.
//!
//! The instantiator fills these slots (mocks, test functions, scenario
//! tables); [`GoRenderer`](crate::domain::render::GoRenderer) owns layout.

/// A whole `_test.go` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestFile {
    pub package: String,
    /// Go module path of the scaffolded backend, used for local imports.
    pub module_path: String,
    /// Imports kept for side effects only (`_ "github.com/mattn/go-sqlite3"`).
    pub blank_imports: Vec<String>,
    pub decls: Vec<Decl>,
}

impl TestFile {
    pub fn new(package: impl Into<String>, module_path: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            module_path: module_path.into(),
            blank_imports: Vec::new(),
            decls: Vec::new(),
        }
    }

    pub fn blank_import(mut self, path: impl Into<String>) -> Self {
        self.blank_imports.push(path.into());
        self
    }

    pub fn mock(mut self, mock: MockType) -> Self {
        self.decls.push(Decl::Mock(mock));
        self
    }

    pub fn test(mut self, test: TestFunc) -> Self {
        self.decls.push(Decl::Test(test));
        self
    }

    pub fn tests(&self) -> impl Iterator<Item = &TestFunc> {
        self.decls.iter().filter_map(|d| match d {
            Decl::Test(t) => Some(t),
            Decl::Mock(_) => None,
        })
    }

    pub fn mocks(&self) -> impl Iterator<Item = &MockType> {
        self.decls.iter().filter_map(|d| match d {
            Decl::Mock(m) => Some(m),
            Decl::Test(_) => None,
        })
    }
}

/// Top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Mock(MockType),
    Test(TestFunc),
}

/// A testify mock: `type MockX struct { mock.Mock }` plus its methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockType {
    pub name: String,
    pub methods: Vec<MockMethod>,
}

impl MockType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn method(mut self, method: MockMethod) -> Self {
        self.methods.push(method);
        self
    }

    /// Receiver variable used inside method bodies.
    pub fn receiver(&self) -> &'static str {
        "m"
    }
}

/// One mocked method. The last result is always `error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockMethod {
    pub name: String,
    pub params: Vec<Param>,
    pub results: Vec<String>,
}

impl MockMethod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn param(mut self, name: &str, ty: &str) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty: ty.into(),
        });
        self
    }

    pub fn returns(mut self, ty: &str) -> Self {
        self.results.push(ty.into());
        self
    }

    /// Every type mentioned in the signature.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.params
            .iter()
            .map(|p| p.ty.as_str())
            .chain(self.results.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: String,
}

/// `func TestX(t *testing.T) { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestFunc {
    pub name: String,
    pub body: Vec<Stmt>,
}

impl TestFunc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: Vec::new(),
        }
    }

    pub fn stmt(mut self, stmt: Stmt) -> Self {
        self.body.push(stmt);
        self
    }

    pub fn stmts(mut self, stmts: impl IntoIterator<Item = Stmt>) -> Self {
        self.body.extend(stmts);
        self
    }

    pub fn line(self, line: impl Into<String>) -> Self {
        self.stmt(Stmt::line(line))
    }

    pub fn blank(self) -> Self {
        self.stmt(Stmt::Blank)
    }

    pub fn table(&self) -> Option<&TableTest> {
        self.body.iter().find_map(|s| match s {
            Stmt::Table(t) => Some(t),
            _ => None,
        })
    }
}

/// A statement inside a function body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Line(String),
    Blank,
    /// `open {` body `close`. `close` is usually `}` or `})`.
    Block {
        open: String,
        body: Vec<Stmt>,
        close: String,
    },
    Table(TableTest),
}

impl Stmt {
    pub fn line(line: impl Into<String>) -> Self {
        Self::Line(line.into())
    }

    pub fn block(open: impl Into<String>, body: Vec<Stmt>, close: impl Into<String>) -> Self {
        Self::Block {
            open: open.into(),
            body,
            close: close.into(),
        }
    }
}

/// `tests := []struct{...}{...}` followed by the `for _, tt := range tests` runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableTest {
    pub fields: Vec<Param>,
    pub rows: Vec<ScenarioRow>,
    pub runner: Vec<Stmt>,
}

impl TableTest {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            rows: Vec::new(),
            runner: Vec::new(),
        }
    }

    pub fn field(mut self, name: &str, ty: &str) -> Self {
        self.fields.push(Param {
            name: name.into(),
            ty: ty.into(),
        });
        self
    }

    pub fn row(mut self, row: ScenarioRow) -> Self {
        self.rows.push(row);
        self
    }

    pub fn runner(mut self, stmts: Vec<Stmt>) -> Self {
        self.runner = stmts;
        self
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

impl Default for TableTest {
    fn default() -> Self {
        Self::new()
    }
}

/// One keyed composite literal in a scenario table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScenarioRow {
    pub entries: Vec<(String, Value)>,
}

impl ScenarioRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), Value::Expr(value.into())));
        self
    }

    pub fn func(mut self, key: &str, signature: &str, body: Vec<Stmt>) -> Self {
        self.entries.push((
            key.into(),
            Value::Func {
                signature: signature.into(),
                body,
            },
        ));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Expr(String),
    /// Function literal spanning several lines.
    Func { signature: String, body: Vec<Stmt> },
}

impl Value {
    pub fn is_multiline(&self) -> bool {
        matches!(self, Self::Func { .. })
    }
}
