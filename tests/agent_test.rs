//! Tests for [`RecipeAgent`] orchestration.
//!
//! Sources are replaced with in-process mocks, except for the end-to-end
//! tests at the bottom which wire real clients against wiremock.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eldhrimnir::providers::{GenerativeProvider, RecipeSource};
use eldhrimnir::{
    Caches, CulinaryAnalyst, Eldhrimnir, EldhrimnirError, NameResolver, QueryType, Recipe,
    RecipeAgent, RecipeQuery, RecipeRequest, Result, TtlCache,
};

// ============================================================================
// Mock sources
// ============================================================================

enum Behavior {
    Succeed,
    Fail,
    Hang,
    Panic,
}

struct MockAnalyst(Behavior);

#[async_trait]
impl GenerativeProvider for MockAnalyst {
    fn name(&self) -> &str {
        "mock-analyst"
    }

    async fn complete(&self, _prompt: &str) -> Result<String> {
        match self.0 {
            Behavior::Succeed => Ok("AI ANALYSIS".to_string()),
            Behavior::Fail => Err(EldhrimnirError::Http("connection refused".to_string())),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok("too late".to_string())
            }
            Behavior::Panic => panic!("analyst exploded"),
        }
    }
}

struct MockSearch(Behavior);

impl MockSearch {
    fn recipes() -> Vec<Recipe> {
        vec![
            Recipe {
                id: 1,
                title: "Tomato Egg Stir-Fry".to_string(),
                ..Default::default()
            },
            Recipe {
                id: 2,
                title: "Egg Drop Soup".to_string(),
                ..Default::default()
            },
        ]
    }

    async fn run(&self) -> Result<Vec<Recipe>> {
        match self.0 {
            Behavior::Succeed => Ok(Self::recipes()),
            Behavior::Fail => Err(EldhrimnirError::Api {
                status: 402,
                message: "quota exceeded".to_string(),
            }),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(Vec::new())
            }
            Behavior::Panic => panic!("search exploded"),
        }
    }
}

#[async_trait]
impl RecipeSource for MockSearch {
    fn name(&self) -> &str {
        "mock-search"
    }

    async fn search_by_ingredients(&self, _ingredients: &[String]) -> Result<Vec<Recipe>> {
        self.run().await
    }

    async fn search_by_dish(&self, _dish_name: &str) -> Result<Vec<Recipe>> {
        self.run().await
    }
}

fn agent(analysis: Behavior, search: Behavior) -> RecipeAgent {
    let analyst = Arc::new(CulinaryAnalyst::new(Some(Arc::new(MockAnalyst(analysis)))));
    RecipeAgent::new(analyst, Arc::new(MockSearch(search)), Caches::new())
}

fn ingredients() -> RecipeQuery {
    RecipeQuery::Ingredients(vec!["鸡蛋".to_string(), "西红柿".to_string()])
}

// ============================================================================
// Outcome classification
// ============================================================================

#[tokio::test]
async fn both_sources_merge() {
    let answer = agent(Behavior::Succeed, Behavior::Succeed)
        .answer(&ingredients())
        .await
        .unwrap();

    assert!(answer.result.starts_with("AI ANALYSIS\n\n## Recipe Search References\n\n"));
    assert!(answer.result.contains("### Reference 2: Egg Drop Soup"));
    assert_eq!(answer.query_type, QueryType::Ingredients);

    let data = answer.supplementary_data;
    assert!(data.ai_available);
    assert!(data.api_available);
    assert_eq!(data.reference_count, 2);
    assert_eq!(data.api_recipes.unwrap().len(), 2);
}

#[tokio::test]
async fn analysis_failure_falls_back_to_template() {
    let answer = agent(Behavior::Fail, Behavior::Succeed)
        .answer(&ingredients())
        .await
        .unwrap();

    assert!(answer.result.starts_with("# Ingredient Analysis & Suggestions"));
    assert!(answer.result.contains("鸡蛋, 西红柿"));
    assert!(answer.result.contains("### Reference 1: Tomato Egg Stir-Fry"));

    let data = answer.supplementary_data;
    assert!(!data.ai_available);
    assert!(data.api_available);
    assert_eq!(data.reference_count, 2);
}

#[tokio::test]
async fn search_failure_keeps_analysis_verbatim() {
    let answer = agent(Behavior::Succeed, Behavior::Fail)
        .answer(&RecipeQuery::Dish("宫保鸡丁".to_string()))
        .await
        .unwrap();

    assert_eq!(answer.result, "AI ANALYSIS");
    assert_eq!(answer.query_type, QueryType::Dish);

    let data = answer.supplementary_data;
    assert!(data.ai_available);
    assert!(!data.api_available);
    assert_eq!(data.reference_count, 0);
    assert!(data.api_recipes.is_none());
}

#[tokio::test]
async fn both_failures_are_an_error() {
    let err = agent(Behavior::Fail, Behavior::Fail)
        .answer(&ingredients())
        .await
        .unwrap_err();
    assert!(matches!(err, EldhrimnirError::NoSourcesAvailable));
}

#[tokio::test]
async fn search_only_dish_uses_guide() {
    let answer = agent(Behavior::Fail, Behavior::Succeed)
        .answer(&RecipeQuery::Dish("宫保鸡丁".to_string()))
        .await
        .unwrap();
    assert!(answer.result.starts_with("# 宫保鸡丁 Cooking Guide"));
    assert!(answer.supplementary_data.nutrition_tips.is_none());
}

#[tokio::test]
async fn analysis_only_dish_has_no_tip_note() {
    let answer = agent(Behavior::Succeed, Behavior::Fail)
        .answer(&RecipeQuery::Dish("宫保鸡丁".to_string()))
        .await
        .unwrap();
    assert_eq!(answer.result, "AI ANALYSIS");
    assert!(answer.supplementary_data.nutrition_tips.is_none());
    assert!(!answer.supplementary_data.api_available);
}

#[tokio::test]
async fn empty_query_is_invalid() {
    let err = agent(Behavior::Succeed, Behavior::Succeed)
        .answer(&RecipeQuery::Ingredients(vec!["  ".to_string()]))
        .await
        .unwrap_err();
    assert!(matches!(err, EldhrimnirError::InvalidInput(_)));
}

// ============================================================================
// Join bounds
// ============================================================================

#[tokio::test(start_paused = true)]
async fn hung_source_is_cut_off_at_deadline() {
    let agent = agent(Behavior::Hang, Behavior::Succeed).with_join_timeout(Duration::from_secs(5));

    let start = tokio::time::Instant::now();
    let answer = agent.answer(&ingredients()).await.unwrap();

    assert!(start.elapsed() <= Duration::from_secs(6));
    assert!(!answer.supplementary_data.ai_available);
    assert!(answer.supplementary_data.api_available);
}

#[tokio::test(start_paused = true)]
async fn both_hung_is_an_error() {
    let agent = agent(Behavior::Hang, Behavior::Hang).with_join_timeout(Duration::from_secs(5));
    let err = agent.answer(&ingredients()).await.unwrap_err();
    assert!(matches!(err, EldhrimnirError::NoSourcesAvailable));
}

/// Resolves ingredient names before searching, echoing each term as a title.
struct ResolvingSearch {
    resolver: NameResolver,
}

#[async_trait]
impl RecipeSource for ResolvingSearch {
    fn name(&self) -> &str {
        "resolving-search"
    }

    async fn search_by_ingredients(&self, ingredients: &[String]) -> Result<Vec<Recipe>> {
        let terms = self.resolver.resolve_ingredients(ingredients).await;
        Ok(terms
            .into_iter()
            .enumerate()
            .map(|(i, term)| Recipe {
                id: i as u64,
                title: term,
                ..Default::default()
            })
            .collect())
    }

    async fn search_by_dish(&self, _dish_name: &str) -> Result<Vec<Recipe>> {
        Ok(Vec::new())
    }
}

#[tokio::test(start_paused = true)]
async fn stalled_translation_still_answers_from_search() {
    let stalled: Arc<dyn GenerativeProvider> = Arc::new(MockAnalyst(Behavior::Hang));
    let search = ResolvingSearch {
        resolver: NameResolver::new(Some(Arc::clone(&stalled)), Arc::new(TtlCache::new("t"))),
    };
    let agent = RecipeAgent::new(
        Arc::new(CulinaryAnalyst::new(Some(stalled))),
        Arc::new(search),
        Caches::new(),
    );
    let query = RecipeQuery::Ingredients(
        [
            "鸡腿", "五花肉", "鲈鱼", "嫩豆腐", "挂面",
            "炒饭", "番茄", "青菜", "小土豆", "肥牛肉",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    );

    let answer = agent.answer(&query).await.unwrap();

    let data = answer.supplementary_data;
    assert!(!data.ai_available);
    assert!(data.api_available);
    assert_eq!(data.reference_count, 10);
}

#[tokio::test]
async fn panicking_source_is_unavailable() {
    let answer = agent(Behavior::Succeed, Behavior::Panic)
        .answer(&ingredients())
        .await
        .unwrap();
    assert!(answer.supplementary_data.ai_available);
    assert!(!answer.supplementary_data.api_available);
}

// ============================================================================
// Request handling
// ============================================================================

#[tokio::test]
async fn handle_reports_invalid_input() {
    let response = agent(Behavior::Succeed, Behavior::Succeed)
        .handle(RecipeRequest::dish("   "))
        .await;
    assert!(!response.success);
    assert_eq!(response.message.as_deref(), Some("dish name must not be empty"));
}

#[tokio::test]
async fn handle_reports_unavailable_sources() {
    let response = agent(Behavior::Fail, Behavior::Fail)
        .handle(RecipeRequest::ingredients(["鸡蛋"]))
        .await;
    assert!(!response.success);
    assert!(response.message.unwrap().contains("no recipe sources"));
}

#[tokio::test]
async fn handle_success_shape() {
    let response = agent(Behavior::Succeed, Behavior::Succeed)
        .handle(RecipeRequest::dish("congee"))
        .await;
    assert!(response.success);
    assert_eq!(response.query_type, "dish");
    assert!(response.timestamp.is_some());
    assert_eq!(response.supplementary_data.unwrap().reference_count, 2);
}

// ============================================================================
// End to end
// ============================================================================

#[tokio::test]
async fn ingredients_without_chat_key_use_search_only() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/findByIngredients"))
        .and(query_param("ingredients", "eggs,tomato"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "title": "Tomato Egg Stir-Fry"},
            {"id": 2, "title": "Shakshuka"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let agent = Eldhrimnir::builder()
        .recipes("spoon")
        .recipes_base_url(mock_server.uri())
        .build()
        .unwrap();

    let response = agent
        .handle(RecipeRequest::ingredients(["鸡蛋", "西红柿"]))
        .await;

    assert!(response.success);
    assert!(response.result.starts_with("# Ingredient Analysis & Suggestions"));
    assert!(response.result.contains("Shakshuka"));

    let data = response.supplementary_data.unwrap();
    assert!(!data.ai_available);
    assert!(data.api_available);
    assert_eq!(data.reference_count, 2);

    assert_eq!(agent.caches().recipes.len(), 1);
    assert!(agent.caches().translations.is_empty());
}

#[tokio::test]
async fn dish_with_both_sources_end_to_end() {
    let chat_server = MockServer::start().await;
    let recipe_server = MockServer::start().await;

    // Translation and analysis both hit the chat endpoint.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "Kung Pao Chicken"}}]
        })))
        .mount(&chat_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/complexSearch"))
        .and(query_param("query", "kung pao chicken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{"id": 9, "title": "Kung Pao Chicken", "servings": 2}]
        })))
        .expect(1)
        .mount(&recipe_server)
        .await;

    let agent = Eldhrimnir::builder()
        .chat("sk-test")
        .chat_base_url(chat_server.uri())
        .recipes("spoon")
        .recipes_base_url(recipe_server.uri())
        .build()
        .unwrap();

    let answer = agent
        .answer(&RecipeQuery::Dish("宫保鸡丁".to_string()))
        .await
        .unwrap();

    assert!(answer.result.contains("## Reference Recipe Details"));
    assert!(answer.supplementary_data.ai_available);
    assert!(answer.supplementary_data.api_available);
    assert_eq!(
        agent.caches().translations.get("dish:宫保鸡丁").as_deref(),
        Some("kung pao chicken")
    );
}
