//! Generative culinary analysis.

use std::sync::Arc;

use tracing::instrument;

use crate::providers::GenerativeProvider;
use crate::types::RecipeQuery;
use crate::{EldhrimnirError, Result};

/// Asks the generative provider for a free-form culinary answer.
pub struct CulinaryAnalyst {
    provider: Option<Arc<dyn GenerativeProvider>>,
}

impl CulinaryAnalyst {
    /// Create an analyst. Without a provider every call fails with
    /// [`EldhrimnirError::NotConfigured`].
    pub fn new(provider: Option<Arc<dyn GenerativeProvider>>) -> Self {
        Self { provider }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Name of the underlying provider, if one is configured.
    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.name())
    }

    /// Answer a query with generated text.
    #[instrument(skip_all, fields(query_type = %query.query_type()))]
    pub async fn analyze(&self, query: &RecipeQuery) -> Result<String> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(EldhrimnirError::NotConfigured("generative"))?;

        let prompt = match query {
            RecipeQuery::Ingredients(items) => ingredients_prompt(items),
            RecipeQuery::Dish(name) => dish_prompt(name),
        };
        provider.complete(&prompt).await
    }
}

fn ingredients_prompt(ingredients: &[String]) -> String {
    let listed = ingredients.join(", ");
    format!(
        r#"You are a professional chef and nutritionist. Give practical cooking advice for the ingredients below.

Ingredients on hand: {listed}

Structure the answer as follows:

## Recommended Dishes

### 1. [Main recommendation]
**Overview**: [flavour and character of the dish]
**Match**: [how well it fits the ingredients on hand, 1-5 stars]
**Full ingredient list**:
- Already have: {listed}
- Need to buy: [anything missing]
**Steps**:
1. [step]
2. [step]
3. [step]
**Tips**: [a professional tip]
**Time**: [preparation + cooking]
**Difficulty**: [easy / medium / challenging]

### 2. [Second recommendation]
[same structure]

### 3. [Creative option]
[same structure]

## Nutrition
- **Main nutrients**: [protein, vitamins, ...]
- **Suited for**: [who benefits]
- **Advice**: [dietary advice]

## Other Combinations
- [simple pairing ideas]

Recommend real home-style dishes, keep the steps clear enough for a home kitchen, mark what needs buying, and reply in the language of the ingredient names."#
    )
}

fn dish_prompt(dish_name: &str) -> String {
    format!(
        r#"You are an experienced professional chef. Give a complete, detailed cooking guide for "{dish_name}".

Structure the answer as follows:

## Dish Details
**Cuisine**: [regional cuisine]
**Flavour**: [spicy, mild, sweet and sour, ...]
**Background**: [short origin story]

## Shopping List
### Main ingredients
- [ingredient]: [quantity] + [how to choose it]
### Seasonings
- [seasoning]: [quantity] + [purpose]

## Steps
### Preparation (about X minutes)
1. **[Prep]**: [how to prepare the ingredients]
2. **[Cutting]**: [knife work]
3. **[Sauce]**: [mixing the seasonings]

### Cooking (about Y minutes)
1. **Step one**: [heat] + [details] + [duration]
2. **Step two**: [heat] + [details] + [duration]
3. **Step three**: [heat] + [details] + [duration]

## Keys to Success
- **Heat control**: [...]
- **Timing**: [...]
- **Seasoning order**: [...]

## Variations
- **Spicier**: [...]
- **Lighter**: [...]
- **Vegetarian**: [...]

## Pairings
- **Staple**: [...]
- **Side dish**: [...]
- **Drink**: [...]

Keep the steps accurate and suited to a home kitchen, keep paragraphs compact, and reply in the language of the dish name."#
    )
}
