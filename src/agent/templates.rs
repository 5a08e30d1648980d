//! Answer text assembly.

/// Fallback answer for an ingredient query when only search succeeded.
pub(crate) fn ingredient_overview(ingredients: &[String], references: &str) -> String {
    let listed = ingredients.join(", ");
    format!(
        "# Ingredient Analysis & Suggestions

## Your Ingredients
You provided: {listed}

These ingredients combine well and can make a varied, nourishing meal.

{references}

## Simple Ways to Cook Them

### Suggested methods
1. **Stir-fry**: cut the main ingredients into pieces and fry quickly over high heat
2. **Soup**: simmer into a soup the whole family can share
3. **Braise**: cook slowly so the flavours blend

### Tips
- Freshness matters most
- Watch the heat and avoid overcooking
- Season lightly to let the ingredients speak

*Note: this is a basic suggestion. Configure the full service for personalised advice.*"
    )
}

/// Fallback answer for a dish query when only search succeeded.
pub(crate) fn dish_guide(dish_name: &str, references: &str) -> String {
    format!(
        "# {dish_name} Cooking Guide

## About the Dish
{dish_name} is a classic dish with its own flavour and tradition.

## Basic Method

### Ingredients
- Main ingredients (chosen to suit the dish)
- Seasonings: salt, light soy sauce, cooking wine
- Aromatics: ginger, garlic, scallion

### Steps
1. **Preparation**
   - Wash and prepare all ingredients
   - Cut everything to size

2. **Cooking**
   - Heat the wok, then the oil
   - Add ingredients in order
   - Season as you go and mind the heat

3. **Plating**
   - Adjust the final seasoning
   - Garnish and serve

### Keys to Success
- Cut ingredients evenly
- Control the heat precisely
- Build the seasoning in layers

{references}

*Note: this is a basic guide. Configure the full service for detailed instruction.*"
    )
}

/// Generated analysis with a labeled reference subsection appended.
pub(crate) fn with_references(analysis: &str, heading: &str, references: &str) -> String {
    format!("{analysis}\n\n## {heading}\n\n{references}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingredient_overview_embeds_inputs() {
        let text = ingredient_overview(&["鸡蛋".to_string(), "西红柿".to_string()], "REFS");
        assert!(text.starts_with("# Ingredient Analysis & Suggestions"));
        assert!(text.contains("You provided: 鸡蛋, 西红柿"));
        assert!(text.contains("REFS"));
    }

    #[test]
    fn dish_guide_embeds_name_twice() {
        let text = dish_guide("宫保鸡丁", "REFS");
        assert!(text.starts_with("# 宫保鸡丁 Cooking Guide"));
        assert_eq!(text.matches("宫保鸡丁").count(), 2);
        assert!(text.contains("REFS"));
    }

    #[test]
    fn references_follow_analysis() {
        let text = with_references("AI", "Heading", "REFS");
        assert_eq!(text, "AI\n\n## Heading\n\nREFS");
    }
}
