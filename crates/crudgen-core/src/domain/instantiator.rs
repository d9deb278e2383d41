//! Template instantiation: module config + fixture plan → test file.
//!
//! `build` fills a [`TestFile`] blueprint; `render` hands it to the
//! [`GoRenderer`]. Every name in the output derives from the module's own
//! config, so DTO types, routes and handlers never leak across modules.

use crate::domain::{
    entities::{
        blueprint::{MockMethod, MockType, ScenarioRow, Stmt, TableTest, TestFile, TestFunc},
        module::ModuleConfig,
    },
    error::DomainError,
    fixtures::{Assignment, FixturePlan, FixtureStep},
    render::GoRenderer,
    value_objects::{ArtifactKind, CrudOp},
};

/// Default Go module path of the scaffolded backend.
pub const DEFAULT_GO_MODULE: &str = "freshease/backend";

const SQLITE_DRIVER: &str = "github.com/mattn/go-sqlite3";
const ENT_TEST_DSN: &str = "file:ent?mode=memory&cache=shared&_fk=1";
const UPSTREAM_ERROR: &str = "database error";

#[derive(Debug, Clone)]
pub struct TemplateInstantiator {
    module_path: String,
    renderer: GoRenderer,
}

impl Default for TemplateInstantiator {
    fn default() -> Self {
        Self::new(DEFAULT_GO_MODULE)
    }
}

impl TemplateInstantiator {
    pub fn new(module_path: impl Into<String>) -> Self {
        Self {
            module_path: module_path.into(),
            renderer: GoRenderer::new(),
        }
    }

    pub fn module_path(&self) -> &str {
        &self.module_path
    }

    /// Render one artifact. Pure: same inputs, same text.
    pub fn render(
        &self,
        kind: ArtifactKind,
        config: &ModuleConfig,
        plan: &FixturePlan,
    ) -> Result<String, DomainError> {
        Ok(self.renderer.render(&self.build(kind, config, plan)?))
    }

    pub fn build(
        &self,
        kind: ArtifactKind,
        config: &ModuleConfig,
        plan: &FixturePlan,
    ) -> Result<TestFile, DomainError> {
        if config.is_special() {
            return Err(DomainError::SpecialModule {
                name: config.name().to_string(),
            });
        }

        let file = TestFile::new(config.name(), &self.module_path);
        Ok(match kind {
            ArtifactKind::Repository => repository_file(file, config, plan),
            ArtifactKind::Service => service_file(file, config),
            ArtifactKind::Controller => controller_file(file, config),
        })
    }
}

/// Success message returned by a module's list handler.
pub fn success_message(config: &ModuleConfig) -> String {
    format!("{} Retrieved Successfully", config.resource_title())
}

// ── Repository ───────────────────────────────────────────────────────────────

fn repository_file(file: TestFile, config: &ModuleConfig, plan: &FixturePlan) -> TestFile {
    let fixtures = fixture_stmts(plan);

    CrudOp::ALL
        .into_iter()
        .fold(file.blank_import(SQLITE_DRIVER), |file, op| {
            let test = TestFunc::new(format!("TestEntRepo_{}", op.repository_method()))
                .line(format!(
                    "client := enttest.Open(t, \"sqlite3\", \"{ENT_TEST_DSN}\")"
                ))
                .line("defer client.Close()")
                .blank()
                .line("repo := NewEntRepo(client)")
                .line("ctx := context.Background()")
                .blank()
                .stmts(fixtures.iter().cloned())
                .stmts(repository_assertions(op, config));
            file.test(test)
        })
}

/// Construction statements for every planned fixture, then `_ = binding`
/// for each so unused bindings still compile.
fn fixture_stmts(plan: &FixturePlan) -> Vec<Stmt> {
    let mut stmts = Vec::new();
    for (index, step) in plan.steps().iter().enumerate() {
        match step {
            FixtureStep::Placeholder { label } => {
                stmts.push(Stmt::line(format!("// TODO: no fixture recipe for {label}")));
                stmts.push(Stmt::Blank);
            }
            FixtureStep::Construct {
                binding, recipe, ..
            } => {
                stmts.push(Stmt::line(format!(
                    "{binding}, err := client.{}.Create().",
                    recipe.accessor()
                )));
                stmts.push(Stmt::line("\tSetID(uuid.New())."));
                for assignment in recipe.assignments() {
                    let line = match assignment {
                        Assignment::Literal { setter, value } => format!("\t{setter}({value})."),
                        Assignment::Edge { setter, label } => {
                            match plan.binding_before(index, label) {
                                Some(target) => format!("\t{setter}({target})."),
                                None => format!("\t// TODO: {setter} needs a {label} fixture"),
                            }
                        }
                    };
                    stmts.push(Stmt::line(line));
                }
                stmts.push(Stmt::line("\tSave(ctx)"));
                stmts.push(Stmt::line("require.NoError(t, err)"));
                stmts.push(Stmt::Blank);
            }
        }
    }

    let bindings = plan.bindings();
    if !bindings.is_empty() {
        stmts.extend(bindings.iter().map(|b| Stmt::line(format!("_ = {b}"))));
        stmts.push(Stmt::Blank);
    }
    stmts
}

fn repository_assertions(op: CrudOp, config: &ModuleConfig) -> Vec<Stmt> {
    match op {
        CrudOp::List => vec![
            Stmt::line("result, err := repo.List(ctx)"),
            Stmt::line("require.NoError(t, err)"),
            Stmt::line("assert.NotNil(t, result)"),
        ],
        CrudOp::Get => vec![
            Stmt::line("got, err := repo.FindByID(ctx, uuid.New())"),
            Stmt::line("assert.Error(t, err)"),
            Stmt::line("assert.Nil(t, got)"),
        ],
        CrudOp::Create | CrudOp::Update | CrudOp::Delete => vec![
            Stmt::line("_ = ctx"),
            Stmt::line("assert.NotNil(t, repo)"),
            Stmt::line(skip_call(op.repository_method(), fields_for(op, config))),
        ],
    }
}

fn fields_for(op: CrudOp, config: &ModuleConfig) -> &[String] {
    match op {
        CrudOp::Create | CrudOp::Update => config.fields(),
        _ => &[],
    }
}

fn skip_call(method: &str, fields: &[String]) -> String {
    if fields.is_empty() {
        format!("t.Skip(\"TODO: implement {method} test\")")
    } else {
        format!(
            "t.Skip(\"TODO: implement {method} test (fields: {})\")",
            fields.join(", ")
        )
    }
}

// ── Service ──────────────────────────────────────────────────────────────────

fn service_file(file: TestFile, config: &ModuleConfig) -> TestFile {
    let dto = config.dto_names();
    let list_ty = format!("[]*{}", dto.get);
    let get_ty = format!("*{}", dto.get);

    let mock = MockType::new("MockRepository")
        .method(
            MockMethod::new("List")
                .param("ctx", "context.Context")
                .returns(&list_ty)
                .returns("error"),
        )
        .method(
            MockMethod::new("FindByID")
                .param("ctx", "context.Context")
                .param("id", "uuid.UUID")
                .returns(&get_ty)
                .returns("error"),
        )
        .method(
            MockMethod::new("Create")
                .param("ctx", "context.Context")
                .param("u", &format!("*{}", dto.create))
                .returns(&get_ty)
                .returns("error"),
        )
        .method(
            MockMethod::new("Update")
                .param("ctx", "context.Context")
                .param("u", &format!("*{}", dto.update))
                .returns(&get_ty)
                .returns("error"),
        )
        .method(
            MockMethod::new("Delete")
                .param("ctx", "context.Context")
                .param("id", "uuid.UUID")
                .returns("error"),
        );

    let table = TableTest::new()
        .field("name", "string")
        .field("mockSetup", "func(*MockRepository)")
        .field("expectedCount", "int")
        .field("expectedError", "bool")
        .row(
            ScenarioRow::new()
                .set("name", "\"success\"")
                .func(
                    "mockSetup",
                    "func(m *MockRepository)",
                    vec![Stmt::line(format!(
                        "m.On(\"List\", mock.Anything).Return({list_ty}{{}}, nil)"
                    ))],
                )
                .set("expectedCount", "0")
                .set("expectedError", "false"),
        )
        .row(
            ScenarioRow::new()
                .set("name", "\"repository error\"")
                .func(
                    "mockSetup",
                    "func(m *MockRepository)",
                    vec![Stmt::line(format!(
                        "m.On(\"List\", mock.Anything).Return(nil, errors.New(\"{UPSTREAM_ERROR}\"))"
                    ))],
                )
                .set("expectedCount", "0")
                .set("expectedError", "true"),
        )
        .runner(vec![
            Stmt::line("mockRepo := new(MockRepository)"),
            Stmt::line("tt.mockSetup(mockRepo)"),
            Stmt::line("svc := NewService(mockRepo)"),
            Stmt::Blank,
            Stmt::line("result, err := svc.List(context.Background())"),
            Stmt::Blank,
            Stmt::block(
                "if tt.expectedError",
                vec![
                    Stmt::line("assert.Error(t, err)"),
                    Stmt::line("assert.Nil(t, result)"),
                ],
                "} else {",
            ),
            Stmt::line("\tassert.NoError(t, err)"),
            Stmt::line("\tassert.NotNil(t, result)"),
            Stmt::line("\tassert.Len(t, result, tt.expectedCount)"),
            Stmt::line("}"),
            Stmt::Blank,
            Stmt::line("mockRepo.AssertExpectations(t)"),
        ]);

    let file = file
        .mock(mock)
        .test(TestFunc::new("TestService_List").stmt(Stmt::Table(table)));
    stub_tests(file, "TestService", config)
}

fn stub_tests(file: TestFile, prefix: &str, config: &ModuleConfig) -> TestFile {
    CrudOp::ALL
        .into_iter()
        .filter(|op| *op != CrudOp::List)
        .fold(file, |file, op| {
            let name = op.service_method();
            file.test(
                TestFunc::new(format!("{prefix}_{name}"))
                    .line(skip_call(name, fields_for(op, config))),
            )
        })
}

// ── Controller ───────────────────────────────────────────────────────────────

fn controller_file(file: TestFile, config: &ModuleConfig) -> TestFile {
    let dto = config.dto_names();
    let list_ty = format!("[]*{}", dto.get);
    let get_ty = format!("*{}", dto.get);
    let resource = format!("/{}", config.resource_path());

    let mock = MockType::new("MockService")
        .method(
            MockMethod::new("List")
                .param("ctx", "context.Context")
                .returns(&list_ty)
                .returns("error"),
        )
        .method(
            MockMethod::new("Get")
                .param("ctx", "context.Context")
                .param("id", "uuid.UUID")
                .returns(&get_ty)
                .returns("error"),
        )
        .method(
            MockMethod::new("Create")
                .param("ctx", "context.Context")
                .param("dto", &dto.create)
                .returns(&get_ty)
                .returns("error"),
        )
        .method(
            MockMethod::new("Update")
                .param("ctx", "context.Context")
                .param("id", "uuid.UUID")
                .param("dto", &dto.update)
                .returns(&get_ty)
                .returns("error"),
        )
        .method(
            MockMethod::new("Delete")
                .param("ctx", "context.Context")
                .param("id", "uuid.UUID")
                .returns("error"),
        );

    let table = TableTest::new()
        .field("name", "string")
        .field("mockSetup", "func(*MockService)")
        .field("expectedStatus", "int")
        .field("expectedMessage", "string")
        .row(
            ScenarioRow::new()
                .set("name", "\"success\"")
                .func(
                    "mockSetup",
                    "func(m *MockService)",
                    vec![Stmt::line(format!(
                        "m.On(\"List\", mock.Anything).Return({list_ty}{{}}, nil)"
                    ))],
                )
                .set("expectedStatus", "http.StatusOK")
                .set("expectedMessage", format!("\"{}\"", success_message(config))),
        )
        .row(
            ScenarioRow::new()
                .set("name", "\"service error\"")
                .func(
                    "mockSetup",
                    "func(m *MockService)",
                    vec![Stmt::line(format!(
                        "m.On(\"List\", mock.Anything).Return(nil, errors.New(\"{UPSTREAM_ERROR}\"))"
                    ))],
                )
                .set("expectedStatus", "http.StatusInternalServerError")
                .set("expectedMessage", format!("\"{UPSTREAM_ERROR}\"")),
        )
        .runner(vec![
            Stmt::line("mockSvc := new(MockService)"),
            Stmt::line("tt.mockSetup(mockSvc)"),
            Stmt::line("controller := NewController(mockSvc)"),
            Stmt::Blank,
            Stmt::line("app := fiber.New()"),
            Stmt::line(format!(
                "app.Get(\"{resource}\", controller.{})",
                config.list_handler()
            )),
            Stmt::Blank,
            Stmt::line(format!(
                "req := httptest.NewRequest(http.MethodGet, \"{resource}\", nil)"
            )),
            Stmt::line("resp, err := app.Test(req)"),
            Stmt::line("require.NoError(t, err)"),
            Stmt::line("defer resp.Body.Close()"),
            Stmt::Blank,
            Stmt::line("assert.Equal(t, tt.expectedStatus, resp.StatusCode)"),
            Stmt::Blank,
            Stmt::line("var responseBody map[string]interface{}"),
            Stmt::line("err = json.NewDecoder(resp.Body).Decode(&responseBody)"),
            Stmt::line("require.NoError(t, err)"),
            Stmt::line("assert.Equal(t, tt.expectedMessage, responseBody[\"message\"])"),
            Stmt::Blank,
            Stmt::line("mockSvc.AssertExpectations(t)"),
        ]);

    let file = file
        .mock(mock)
        .test(TestFunc::new("TestController_List").stmt(Stmt::Table(table)));
    stub_tests(file, "TestController", config)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::LazyLock;

    use regex::Regex;

    use super::*;
    use crate::domain::{
        fixtures::{FixtureRecipe, FixtureSynthesizer, RecipeBook},
        registry::ModuleRegistry,
    };

    static DTO_TOKEN: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\b(?:Get|Create|Update)(\w+)DTO\b").unwrap());

    fn module(name: &str) -> ModuleConfig {
        ModuleRegistry::builtin().lookup(name).unwrap().clone()
    }

    fn render(kind: ArtifactKind, config: &ModuleConfig) -> String {
        let book = RecipeBook::builtin();
        let plan = FixtureSynthesizer::new(&book).synthesize(config.requires());
        TemplateInstantiator::default()
            .render(kind, config, &plan)
            .unwrap()
    }

    fn imports(text: &str) -> BTreeSet<String> {
        let start = text.find("import (\n").unwrap() + "import (\n".len();
        let end = start + text[start..].find(")\n").unwrap();
        text[start..end]
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn dto_tokens_match_own_prefix() {
        let registry = ModuleRegistry::builtin();
        for config in registry.generatable() {
            for kind in ArtifactKind::ALL {
                let text = render(kind, config);
                for caps in DTO_TOKEN.captures_iter(&text) {
                    assert_eq!(&caps[1], config.dto_prefix(), "{} {kind}", config.name());
                }
            }
        }
    }

    #[test]
    fn service_list_success_returns_empty_non_nil_collection() {
        let text = render(ArtifactKind::Service, &module("recipes"));
        assert!(text.contains(
            "m.On(\"List\", mock.Anything).Return([]*GetRecipeDTO{}, nil)"
        ));
        assert!(text.contains("assert.NoError(t, err)"));
        assert!(text.contains("assert.NotNil(t, result)"));
        assert!(text.contains("errors.New(\"database error\")"));
        for stub in ["TestService_Get", "TestService_Create", "TestService_Update", "TestService_Delete"] {
            assert!(text.contains(&format!("func {stub}(t *testing.T)")), "{stub}");
        }
    }

    #[test]
    fn service_mock_implements_repository_contract() {
        let text = render(ArtifactKind::Service, &module("recipes"));
        for sig in [
            "List(ctx context.Context) ([]*GetRecipeDTO, error)",
            "FindByID(ctx context.Context, id uuid.UUID) (*GetRecipeDTO, error)",
            "Create(ctx context.Context, u *CreateRecipeDTO) (*GetRecipeDTO, error)",
            "Update(ctx context.Context, u *UpdateRecipeDTO) (*GetRecipeDTO, error)",
            "Delete(ctx context.Context, id uuid.UUID) error",
        ] {
            assert!(text.contains(&format!("func (m *MockRepository) {sig} {{")), "{sig}");
        }
    }

    #[test]
    fn controller_routes_and_messages() {
        let text = render(ArtifactKind::Controller, &module("order_items"));
        assert!(text.contains("app.Get(\"/order-items\", controller.ListOrderItems)"));
        assert!(text.contains("httptest.NewRequest(http.MethodGet, \"/order-items\", nil)"));
        assert!(text.contains("expectedStatus:  http.StatusOK,"));
        assert!(text.contains("expectedMessage: \"OrderItems Retrieved Successfully\","));
        assert!(text.contains("expectedStatus:  http.StatusInternalServerError,"));
        assert!(text.contains("expectedMessage: \"database error\","));
        assert!(text.contains("\t\texpectedMessage string\n"));
        assert!(!text.contains("expectedBody"));
        assert!(!text.contains("context.Background()"));
    }

    #[test]
    fn controller_table_uses_typed_message_field() {
        let file = TemplateInstantiator::default()
            .build(ArtifactKind::Controller, &module("recipes"), &FixturePlan::empty())
            .unwrap();
        let table = file.tests().find_map(TestFunc::table).unwrap();
        assert_eq!(
            table.field_names(),
            ["name", "mockSetup", "expectedStatus", "expectedMessage"]
        );
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn controller_mock_implements_service_contract() {
        let text = render(ArtifactKind::Controller, &module("meal_plans"));
        for sig in [
            "List(ctx context.Context) ([]*GetMealPlanDTO, error)",
            "Get(ctx context.Context, id uuid.UUID) (*GetMealPlanDTO, error)",
            "Create(ctx context.Context, dto CreateMealPlanDTO) (*GetMealPlanDTO, error)",
            "Update(ctx context.Context, id uuid.UUID, dto UpdateMealPlanDTO) (*GetMealPlanDTO, error)",
            "Delete(ctx context.Context, id uuid.UUID) error",
        ] {
            assert!(text.contains(&format!("func (m *MockService) {sig} {{")), "{sig}");
        }
    }

    #[test]
    fn recipes_route_is_not_double_pluralized() {
        let text = render(ArtifactKind::Controller, &module("recipes"));
        assert!(text.contains("app.Get(\"/recipes\", controller.ListRecipes)"));
        assert!(!text.contains("recipess"));
    }

    #[test]
    fn repository_embeds_fixtures_in_order() {
        let text = render(ArtifactKind::Repository, &module("reviews"));
        let list = &text[text.find("func TestEntRepo_List").unwrap()..];
        let vendor = list.find("vendor, err := client.Vendor.Create().").unwrap();
        let product = list.find("product, err := client.Product.Create().").unwrap();
        let user = list.find("user, err := client.User.Create().").unwrap();
        assert!(vendor < product && product < user);
        assert!(list.contains("\t\tSetVendor(vendor).\n"));
        assert_eq!(text.matches("vendor, err := client.Vendor").count(), 5);
    }

    #[test]
    fn repository_has_all_five_operations() {
        let text = render(ArtifactKind::Repository, &module("recipes"));
        for op in ["List", "FindByID", "Create", "Update", "Delete"] {
            assert!(text.contains(&format!("func TestEntRepo_{op}(t *testing.T) {{")));
        }
        assert!(text.contains("implement Create test (fields: name, instructions, kcal)"));
        assert!(text.contains("implement Delete test\")"));
    }

    #[test]
    fn placeholder_for_unknown_label() {
        let config = ModuleConfig::builder("stock_levels")
            .dto_prefix("StockLevel")
            .requires(["Warehouse"])
            .build()
            .unwrap();
        let text = render(ArtifactKind::Repository, &config);
        assert!(text.contains("\t// TODO: no fixture recipe for Warehouse\n"));
    }

    #[test]
    fn edge_without_an_earlier_binding_becomes_a_comment() {
        let mut book = RecipeBook::new();
        // Owner needs an unknown Warehouse; A and B require each other.
        book.insert(FixtureRecipe::new("Owner").edge("SetWarehouse", "Warehouse"))
            .unwrap();
        book.insert(FixtureRecipe::new("A").edge("SetB", "B")).unwrap();
        book.insert(FixtureRecipe::new("B").edge("SetA", "A")).unwrap();
        let config = ModuleConfig::builder("stock_levels")
            .dto_prefix("StockLevel")
            .requires(["Owner", "A"])
            .build()
            .unwrap();

        let plan = FixtureSynthesizer::new(&book).synthesize(config.requires());
        let text = TemplateInstantiator::default()
            .render(ArtifactKind::Repository, &config, &plan)
            .unwrap();

        assert!(text.contains("\t\t// TODO: SetWarehouse needs a Warehouse fixture\n"));
        assert!(!text.contains("SetWarehouse(warehouse)"));
        assert!(text.contains("\t\t// TODO: SetA needs a A fixture\n"));
        assert!(!text.contains("SetA(a)"));
        assert!(text.contains("\t\tSetB(b).\n"));
    }

    #[test]
    fn imports_are_exactly_what_is_used() {
        let config = module("recipes");
        let expect = |kind, paths: &[&str]| {
            let got = imports(&render(kind, &config));
            let want: BTreeSet<String> = paths.iter().map(|p| p.to_string()).collect();
            assert_eq!(got, want, "{kind}");
        };

        expect(
            ArtifactKind::Repository,
            &[
                "\"context\"",
                "\"testing\"",
                "\"freshease/backend/ent/enttest\"",
                "\"github.com/google/uuid\"",
                "_ \"github.com/mattn/go-sqlite3\"",
                "\"github.com/stretchr/testify/assert\"",
                "\"github.com/stretchr/testify/require\"",
            ],
        );
        expect(
            ArtifactKind::Service,
            &[
                "\"context\"",
                "\"errors\"",
                "\"testing\"",
                "\"github.com/google/uuid\"",
                "\"github.com/stretchr/testify/assert\"",
                "\"github.com/stretchr/testify/mock\"",
            ],
        );
        expect(
            ArtifactKind::Controller,
            &[
                "\"context\"",
                "\"encoding/json\"",
                "\"errors\"",
                "\"net/http\"",
                "\"net/http/httptest\"",
                "\"testing\"",
                "\"github.com/gofiber/fiber/v2\"",
                "\"github.com/google/uuid\"",
                "\"github.com/stretchr/testify/assert\"",
                "\"github.com/stretchr/testify/mock\"",
                "\"github.com/stretchr/testify/require\"",
            ],
        );
    }

    #[test]
    fn custom_go_module_path() {
        let config = module("recipes");
        let text = TemplateInstantiator::new("example.com/shop")
            .render(ArtifactKind::Repository, &config, &FixturePlan::empty())
            .unwrap();
        assert!(text.contains("\"example.com/shop/ent/enttest\""));
    }

    #[test]
    fn special_modules_are_rejected() {
        let uploads = module("uploads");
        let err = TemplateInstantiator::default()
            .build(ArtifactKind::Service, &uploads, &FixturePlan::empty())
            .unwrap_err();
        assert_eq!(err, DomainError::SpecialModule { name: "uploads".into() });
    }

    #[test]
    fn rendering_is_deterministic() {
        let config = module("meal_plan_items");
        assert_eq!(
            render(ArtifactKind::Repository, &config),
            render(ArtifactKind::Repository, &config)
        );
    }
}
