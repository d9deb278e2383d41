//! Identifier case conversion shared by module naming and rendering.

/// `meal_plans`, `meal-plans` and `mealPlans` all become `MealPlans`.
pub fn to_pascal_case(s: &str) -> String {
    words(s).iter().map(|w| capitalize(w)).collect()
}

/// Lowercase words joined by `-`. HTTP resource paths use this form.
pub fn to_kebab_case(s: &str) -> String {
    words(s).join("-")
}

/// Lowercase the first character and keep the rest (`MealPlan` -> `mealPlan`).
///
/// Go binding names for fixtures are derived this way.
pub fn to_lower_camel(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn is_separator(c: char) -> bool {
    c == '_' || c == '-' || c.is_whitespace()
}

/// True when a new word starts at `chars[i]`.
///
/// A word starts at a lower-to-upper transition (`meal|Plan`) and at the last
/// capital of an acronym followed by lowercase (`HTTP|Request`).
fn starts_word(chars: &[char], i: usize) -> bool {
    if i == 0 || !chars[i].is_uppercase() {
        return false;
    }
    let prev = chars[i - 1];
    if prev.is_lowercase() || prev.is_ascii_digit() {
        return true;
    }
    prev.is_uppercase() && chars.get(i + 1).is_some_and(|n| n.is_lowercase())
}

/// Lowercase words of an identifier in any of the supported casings.
fn words(input: &str) -> Vec<String> {
    input
        .split(is_separator)
        .filter(|part| !part.is_empty())
        .flat_map(|part| {
            let chars: Vec<char> = part.chars().collect();
            let mut out = Vec::new();
            let mut begin = 0;
            for i in 1..chars.len() {
                if starts_word(&chars, i) {
                    out.push(chars[begin..i].iter().collect::<String>().to_lowercase());
                    begin = i;
                }
            }
            out.push(chars[begin..].iter().collect::<String>().to_lowercase());
            out
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_from_snake() {
        assert_eq!(to_pascal_case("meal_plan_items"), "MealPlanItems");
        assert_eq!(to_pascal_case("recipes"), "Recipes");
    }

    #[test]
    fn pascal_from_kebab() {
        assert_eq!(to_pascal_case("order-items"), "OrderItems");
    }

    #[test]
    fn pascal_keeps_camel_boundaries() {
        assert_eq!(to_pascal_case("mealPlan"), "MealPlan");
        assert_eq!(to_pascal_case("HTTPRequest"), "HttpRequest");
    }

    #[test]
    fn kebab_from_any_casing() {
        assert_eq!(to_kebab_case("order_items"), "order-items");
        assert_eq!(to_kebab_case("MealPlanItem"), "meal-plan-item");
    }

    #[test]
    fn digits_end_a_word() {
        assert_eq!(to_kebab_case("v2Recipes"), "v2-recipes");
    }

    #[test]
    fn lower_camel() {
        assert_eq!(to_lower_camel("MealPlan"), "mealPlan");
        assert_eq!(to_lower_camel("User"), "user");
        assert_eq!(to_lower_camel(""), "");
    }
}
