use std::collections::BTreeMap;

use super::{Recipe, RecipeNode};
use crate::{
    BlendState, ChopState, FoodKind, ObjectKind, RecipeError, StateValue, ToastState,
};

const CHOPPED: StateValue = StateValue::Chop(ChopState::Chopped);
const MASHED: StateValue = StateValue::Blend(BlendState::Mashed);
const TOASTED: StateValue = StateValue::Toast(ToastState::Toasted);

/// Registry of named recipe nodes and the recipes built from them.
///
/// Node ids are assigned sequentially in definition order and never reused,
/// so [`RecipeBook::num_goals`] is the length of every goal vector produced
/// from this book.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    nodes: BTreeMap<String, RecipeNode>,
    recipes: BTreeMap<String, String>,
    next_id: usize,
}

impl RecipeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a node whose children are previously defined nodes.
    pub fn define_node(
        &mut self,
        name: &str,
        root_type: ObjectKind,
        conditions: &[StateValue],
        contains: &[&str],
    ) -> Result<usize, RecipeError> {
        if self.nodes.contains_key(name) {
            return Err(RecipeError::DuplicateNode(name.to_string()));
        }
        let children = contains
            .iter()
            .map(|child| {
                self.nodes
                    .get(*child)
                    .cloned()
                    .ok_or_else(|| RecipeError::UnknownNode(child.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.insert(name, root_type, conditions, children).id)
    }

    /// Expose the node `node` as a recipe called `name`.
    pub fn register(&mut self, name: &str, node: &str) -> Result<(), RecipeError> {
        if !self.nodes.contains_key(node) {
            return Err(RecipeError::UnknownNode(node.to_string()));
        }
        self.recipes.insert(name.to_string(), node.to_string());
        Ok(())
    }

    pub fn node(&self, name: &str) -> Option<&RecipeNode> {
        self.nodes.get(name)
    }

    /// A fresh, unevaluated instance of the registered recipe `name`.
    pub fn recipe(&self, name: &str) -> Result<Recipe, RecipeError> {
        let node = self
            .recipes
            .get(name)
            .ok_or_else(|| RecipeError::UnknownRecipe(name.to_string()))?;
        let root = self
            .nodes
            .get(node)
            .ok_or_else(|| RecipeError::UnknownNode(node.clone()))?;
        Ok(Recipe::new(name, root.clone(), self.num_goals()))
    }

    /// A recipe rooted at any defined node, registered or not.
    pub fn recipe_for_node(&self, node: &str) -> Result<Recipe, RecipeError> {
        let root = self
            .nodes
            .get(node)
            .ok_or_else(|| RecipeError::UnknownNode(node.to_string()))?;
        Ok(Recipe::new(node, root.clone(), self.num_goals()))
    }

    pub fn num_goals(&self) -> usize {
        self.next_id
    }

    pub fn recipe_names(&self) -> impl Iterator<Item = &str> {
        self.recipes.keys().map(String::as_str)
    }

    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    fn insert(
        &mut self,
        name: &str,
        root_type: ObjectKind,
        conditions: &[StateValue],
        contains: Vec<RecipeNode>,
    ) -> RecipeNode {
        let node = RecipeNode {
            id: self.next_id,
            name: name.to_string(),
            root_type,
            conditions: conditions.to_vec(),
            contains,
        };
        self.next_id += 1;
        self.nodes.insert(name.to_string(), node.clone());
        node
    }

    /// The built-in salad, smoothie-base and toast recipes.
    pub fn standard() -> Self {
        let mut book = Self::new();
        let food = ObjectKind::Food;

        let lettuce = book.insert("ChoppedLettuce", food(FoodKind::Lettuce), &[CHOPPED], vec![]);
        let onion = book.insert("ChoppedOnion", food(FoodKind::Onion), &[CHOPPED], vec![]);
        let tomato = book.insert("ChoppedTomato", food(FoodKind::Tomato), &[CHOPPED], vec![]);
        let apple = book.insert("ChoppedApple", food(FoodKind::Apple), &[CHOPPED], vec![]);
        let cucumber = book.insert("ChoppedCucumber", food(FoodKind::Cucumber), &[CHOPPED], vec![]);
        let watermelon =
            book.insert("ChoppedWatermelon", food(FoodKind::Watermelon), &[CHOPPED], vec![]);
        let banana = book.insert("ChoppedBanana", food(FoodKind::Banana), &[CHOPPED], vec![]);
        let mashed_banana = book.insert("MashedBanana", food(FoodKind::Banana), &[MASHED], vec![]);
        book.insert("ChoppedCarrot", food(FoodKind::Carrot), &[CHOPPED], vec![]);
        let mashed_carrot = book.insert("MashedCarrot", food(FoodKind::Carrot), &[MASHED], vec![]);
        book.insert("ChoppedBread", food(FoodKind::Bread), &[CHOPPED], vec![]);
        let toast = book.insert("ToastedBread", food(FoodKind::Bread), &[CHOPPED, TOASTED], vec![]);

        let plates: [(&str, Vec<RecipeNode>); 12] = [
            ("TomatoSaladPlate", vec![tomato.clone()]),
            ("TomatoLettucePlate", vec![tomato.clone(), lettuce.clone()]),
            (
                "TomatoLettuceOnionPlate",
                vec![tomato.clone(), lettuce, onion.clone()],
            ),
            ("CarrotBananaPlate", vec![mashed_carrot.clone(), banana]),
            ("MashedCarrotBananaPlate", vec![mashed_carrot.clone(), mashed_banana]),
            ("CucumberOnionPlate", vec![cucumber, onion]),
            ("AppleWatermelonPlate", vec![apple.clone(), watermelon.clone()]),
            ("MashedCarrotPlate", vec![mashed_carrot]),
            // Two distinct slices.
            ("ToastedBreadPlate", vec![toast.clone(), toast.clone()]),
            ("TomatoToastedBreadPlate", vec![toast, tomato]),
            ("ApplePlate", vec![apple]),
            ("WatermelonPlate", vec![watermelon]),
        ];
        let mut plate_nodes = BTreeMap::new();
        for (name, contains) in plates {
            let node = book.insert(name, ObjectKind::Plate, &[], contains);
            plate_nodes.insert(name, node);
            book.recipes.insert(name.to_string(), name.to_string());
        }

        let delivered = [
            ("TomatoSalad", "TomatoSaladPlate"),
            ("TomatoLettuceSalad", "TomatoLettucePlate"),
            ("TomatoLettuceOnionSalad", "TomatoLettuceOnionPlate"),
            ("CarrotBanana", "CarrotBananaPlate"),
            ("MashedCarrotBanana", "MashedCarrotBananaPlate"),
            ("CucumberOnion", "CucumberOnionPlate"),
            ("AppleWatermelon", "AppleWatermelonPlate"),
        ];
        for (name, plate) in delivered {
            let contains = plate_nodes.get(plate).cloned().into_iter().collect();
            book.insert(name, ObjectKind::Deliversquare, &[], contains);
            book.recipes.insert(name.to_string(), name.to_string());
        }

        // Never satisfiable: a floor tile cannot sit on a delivery square.
        let floor = book.insert("floor", ObjectKind::Floor, &[], vec![]);
        book.insert("no_recipe", ObjectKind::Deliversquare, &[], vec![floor]);
        book.recipes
            .insert("no_recipe".to_string(), "no_recipe".to_string());

        book
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_ids_follow_definition_order() {
        let book = RecipeBook::standard();
        assert_eq!(book.num_goals(), 33);
        assert_eq!(book.node("ChoppedLettuce").map(|n| n.id), Some(0));
        assert_eq!(book.node("ToastedBread").map(|n| n.id), Some(11));
        assert_eq!(book.node("TomatoSaladPlate").map(|n| n.id), Some(12));
        assert_eq!(book.node("TomatoSalad").map(|n| n.id), Some(24));
        assert_eq!(book.node("no_recipe").map(|n| n.id), Some(32));
        assert_eq!(book.recipe_names().count(), 20);
    }

    #[test]
    fn shared_children_keep_their_ids() {
        let book = RecipeBook::standard();
        let salad = book.recipe("TomatoLettuceSalad").unwrap();
        assert_eq!(
            salad.root().node_ids().into_iter().collect::<Vec<_>>(),
            vec![0, 2, 13, 25]
        );
        assert_eq!(salad.num_goals(), 33);
    }

    #[test]
    fn define_node_rejects_unknown_children_and_duplicates() {
        let mut book = RecipeBook::new();
        let soup = book.define_node("Broth", ObjectKind::Food(FoodKind::Onion), &[], &[]);
        assert_eq!(soup, Ok(0));
        assert_eq!(
            book.define_node("Broth", ObjectKind::Plate, &[], &[]),
            Err(RecipeError::DuplicateNode("Broth".into()))
        );
        assert_eq!(
            book.define_node("Bowl", ObjectKind::Plate, &[], &["Noodles"]),
            Err(RecipeError::UnknownNode("Noodles".into()))
        );
        assert_eq!(book.num_goals(), 1);
        assert!(matches!(
            book.recipe("Broth"),
            Err(RecipeError::UnknownRecipe(_))
        ));
        book.register("Broth", "Broth").unwrap();
        assert_eq!(book.recipe("Broth").map(|r| r.node_count()), Ok(1));
    }
}
