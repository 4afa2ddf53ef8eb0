//! Day 21: Allergen Assessment

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{anyhow, bail};
use aoc_framework::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};
use itertools::Itertools;

use crate::utils::elimination::{EliminationError, eliminate};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(day = 21, tags = ["sets"])]
pub struct Solver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Food {
    pub ingredients: BTreeSet<String>,
    pub allergens: BTreeSet<String>,
}

#[derive(Debug)]
pub struct SharedData {
    foods: Vec<Food>,
    /// Allergen to ingredient, filled by whichever part runs first
    assignment: Option<BTreeMap<String, String>>,
}

/// Pair each allergen with the one ingredient that contains it.
///
/// An allergen's candidates are the ingredients common to every food that
/// lists it; the candidates are then narrowed by singleton elimination.
pub fn resolve_allergens(foods: &[Food]) -> Result<BTreeMap<String, String>, EliminationError> {
    let mut candidates: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for food in foods {
        let ingredients: BTreeSet<&str> = food.ingredients.iter().map(String::as_str).collect();
        for allergen in &food.allergens {
            candidates
                .entry(allergen.as_str())
                .and_modify(|set| set.retain(|i| ingredients.contains(i)))
                .or_insert_with(|| ingredients.clone());
        }
    }

    Ok(eliminate(candidates)?
        .into_iter()
        .map(|(allergen, ingredient)| (allergen.to_string(), ingredient.to_string()))
        .collect())
}

fn parse_food(line: &str) -> anyhow::Result<Food> {
    let (ingredients, allergens) = match line.split_once('(') {
        Some((ingredients, rest)) => {
            let list = rest
                .strip_prefix("contains")
                .and_then(|list| list.strip_suffix(')'))
                .ok_or_else(|| anyhow!("expected `(contains ...)` after the ingredients"))?;
            (ingredients, list)
        }
        None => (line, ""),
    };

    let ingredients: BTreeSet<String> = ingredients.split_whitespace().map(str::to_owned).collect();
    if ingredients.is_empty() {
        bail!("food without ingredients");
    }
    let allergens = allergens
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_owned)
        .collect();
    Ok(Food {
        ingredients,
        allergens,
    })
}

impl AocParser for Solver {
    type SharedData<'a> = SharedData;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let foods = input
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| parse_food(line.trim()).map_err(|e| ParseError::at_line(i, e)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SharedData {
            foods,
            assignment: None,
        })
    }
}

fn solve_once_for_both(
    shared: &mut SharedData,
) -> Result<(&[Food], &BTreeMap<String, String>), SolveError> {
    let assignment = match shared.assignment.take() {
        Some(assignment) => assignment,
        None => resolve_allergens(&shared.foods).map_err(SolveError::failed)?,
    };
    let assignment = shared.assignment.insert(assignment);
    Ok((shared.foods.as_slice(), &*assignment))
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let (foods, assignment) = solve_once_for_both(shared)?;
        let unsafe_ingredients: BTreeSet<&str> = assignment.values().map(String::as_str).collect();
        let safe = foods
            .iter()
            .flat_map(|food| &food.ingredients)
            .filter(|i| !unsafe_ingredients.contains(i.as_str()))
            .count();
        Ok(safe.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let (_, assignment) = solve_once_for_both(shared)?;
        Ok(assignment.values().join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "\
mxmxvkd kfcds sqjhc nhms (contains dairy, fish)
trh fvjkl sbzzf mxmxvkd (contains dairy)
sqjhc fvjkl (contains soy)
sqjhc mxmxvkd sbzzf (contains fish)
";

    #[test]
    fn test_parse_food() {
        let food = parse_food("a b (contains x, y)").unwrap();
        assert_eq!(food.ingredients.len(), 2);
        assert!(food.allergens.contains("y"));

        let plain = parse_food("a b c").unwrap();
        assert!(plain.allergens.is_empty());
    }

    #[test]
    fn test_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(<Solver as PartSolver<1>>::solve(&mut shared).unwrap(), "5");
        assert_eq!(
            <Solver as PartSolver<2>>::solve(&mut shared).unwrap(),
            "mxmxvkd,sqjhc,fvjkl"
        );
    }

    #[test]
    fn test_part_two_runs_alone() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert!(shared.assignment.is_none());
        assert_eq!(
            <Solver as PartSolver<2>>::solve(&mut shared).unwrap(),
            "mxmxvkd,sqjhc,fvjkl"
        );
        assert_eq!(shared.assignment.as_ref().map(BTreeMap::len), Some(3));
    }

    #[test]
    fn test_unresolvable() {
        let foods = Solver::parse("a b (contains x)").unwrap().foods;
        assert_eq!(
            resolve_allergens(&foods),
            Err(EliminationError::Ambiguous("x".to_string()))
        );

        let foods = Solver::parse("a (contains x)\nb (contains x)").unwrap().foods;
        assert_eq!(
            resolve_allergens(&foods),
            Err(EliminationError::NoCandidate("x".to_string()))
        );
    }

    #[test]
    fn test_empty_input() {
        let mut shared = Solver::parse("").unwrap();
        assert_eq!(<Solver as PartSolver<1>>::solve(&mut shared).unwrap(), "0");
        assert_eq!(<Solver as PartSolver<2>>::solve(&mut shared).unwrap(), "");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Solver::parse("a b (contains x)\nc (has y)"),
            Err(ParseError::InvalidLine { line: 2, .. })
        ));
        assert!(matches!(
            Solver::parse("(contains x)"),
            Err(ParseError::InvalidLine { line: 1, .. })
        ));
    }
}
