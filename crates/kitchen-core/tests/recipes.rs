use kitchen_core::{
    match_recipes, ChopState, FoodKind, Location, ObjectId, ObjectKind, Recipe, RecipeBook,
    StateValue, ToastState, World, WorldConfig,
};

const CHOPPED: StateValue = StateValue::Chop(ChopState::Chopped);
const TOASTED: StateValue = StateValue::Toast(ToastState::Toasted);

fn food(world: &mut World, kind: FoodKind, row: i32, col: i32) -> ObjectId {
    world
        .place(ObjectKind::Food(kind), Location::new(row, col))
        .unwrap()
}

fn chopped(world: &mut World, kind: FoodKind, row: i32, col: i32) -> ObjectId {
    let id = food(world, kind, row, col);
    world.chop(id).unwrap();
    id
}

fn plate(world: &mut World, row: i32, col: i32) -> ObjectId {
    world.place(ObjectKind::Plate, Location::new(row, col)).unwrap()
}

fn pool(world: &World) -> Vec<ObjectId> {
    world.objects().ids().collect()
}

fn evaluate(book: &RecipeBook, node: &str, world: &World, pool: &[ObjectId]) -> Recipe {
    let mut recipe = book.recipe_for_node(node).unwrap();
    recipe.update_recipe_state(world, pool);
    recipe
}

fn completed(book: &RecipeBook, node: &str, world: &World, pool: &[ObjectId]) -> bool {
    evaluate(book, node, world, pool).completed()
}

#[test]
fn delivered_salad_completes_every_level() {
    let book = RecipeBook::standard();
    let mut world = World::new(WorldConfig::default());
    let deliver = world
        .place(ObjectKind::Deliversquare, Location::new(0, 0))
        .unwrap();
    let plate = plate(&mut world, 1, 1);
    let lettuce = chopped(&mut world, FoodKind::Lettuce, 1, 2);
    let tomato = chopped(&mut world, FoodKind::Tomato, 1, 3);
    world.add_content(plate, lettuce).unwrap();
    world.add_content(plate, tomato).unwrap();
    world.add_content(deliver, plate).unwrap();

    let all = pool(&world);
    assert!(completed(&book, "ChoppedLettuce", &world, &all));
    assert!(completed(&book, "TomatoLettucePlate", &world, &all));
    assert!(completed(&book, "TomatoLettuceSalad", &world, &all));
    assert!(!completed(&book, "ChoppedOnion", &world, &all));

    let without_square: Vec<ObjectId> = all.into_iter().filter(|id| *id != deliver).collect();
    assert!(completed(&book, "TomatoLettucePlate", &world, &without_square));
    assert!(!completed(&book, "TomatoLettuceSalad", &world, &without_square));
}

#[test]
fn nested_objects_are_found_from_the_outermost_holder() {
    let book = RecipeBook::standard();
    let mut world = World::new(WorldConfig::default());
    let deliver = world
        .place(ObjectKind::Deliversquare, Location::new(0, 0))
        .unwrap();
    let plate = plate(&mut world, 1, 1);
    let tomato = chopped(&mut world, FoodKind::Tomato, 1, 2);
    world.add_content(plate, tomato).unwrap();
    world.add_content(deliver, plate).unwrap();

    let recipe = evaluate(&book, "TomatoSalad", &world, &[deliver]);
    assert!(recipe.completed());
    assert_eq!(recipe.matched_root(), Some(deliver));
}

#[test]
fn bread_needs_each_axis_it_names() {
    let book = RecipeBook::standard();
    let mut world = World::new(WorldConfig::default());
    let bread = food(&mut world, FoodKind::Bread, 2, 2);

    let all = pool(&world);
    assert!(!completed(&book, "ChoppedBread", &world, &all));
    assert!(!completed(&book, "ToastedBread", &world, &all));

    let slices = world.chop(bread).unwrap();
    assert_eq!(slices.len(), 1);
    let all = pool(&world);
    assert!(completed(&book, "ChoppedBread", &world, &all));
    assert!(!completed(&book, "ToastedBread", &world, &all));

    assert!(world.set_food_state(bread, TOASTED).unwrap());
    assert!(completed(&book, "ToastedBread", &world, &[bread]));

    // Toasted alone is not enough: ToastedBread also requires the chop.
    let loaf = food(&mut world, FoodKind::Bread, 3, 3);
    world.set_food_state(loaf, TOASTED).unwrap();
    assert!(!completed(&book, "ChoppedBread", &world, &[loaf]));
    assert!(!completed(&book, "ToastedBread", &world, &[loaf]));
}

#[test]
fn toasted_bread_plate_needs_two_slices() {
    let book = RecipeBook::standard();
    let mut world = World::new(WorldConfig::default());
    let plate = plate(&mut world, 1, 1);
    let bread = food(&mut world, FoodKind::Bread, 2, 2);
    let slice = world.chop(bread).unwrap()[0];
    world.set_food_state(bread, TOASTED).unwrap();

    world.add_content(plate, bread).unwrap();
    assert!(!completed(&book, "ToastedBreadPlate", &world, &pool(&world)));

    // Chopped but untoasted second slice still falls short.
    world.add_content(plate, slice).unwrap();
    assert!(!completed(&book, "ToastedBreadPlate", &world, &pool(&world)));

    world.set_food_state(slice, TOASTED).unwrap();
    assert!(completed(&book, "ToastedBreadPlate", &world, &pool(&world)));
}

#[test]
fn one_content_object_cannot_fill_two_children() {
    let mut book = RecipeBook::new();
    book.define_node("ChoppedTomato", ObjectKind::Food(FoodKind::Tomato), &[CHOPPED], &[])
        .unwrap();
    book.define_node("OneTomato", ObjectKind::Plate, &[], &["ChoppedTomato"])
        .unwrap();
    book.define_node(
        "TwoTomatoes",
        ObjectKind::Plate,
        &[],
        &["ChoppedTomato", "ChoppedTomato"],
    )
    .unwrap();

    let mut world = World::new(WorldConfig::default());
    let plate = plate(&mut world, 0, 0);
    let first = chopped(&mut world, FoodKind::Tomato, 0, 1);
    world.add_content(plate, first).unwrap();

    assert!(completed(&book, "OneTomato", &world, &pool(&world)));
    assert!(!completed(&book, "TwoTomatoes", &world, &pool(&world)));

    let second = chopped(&mut world, FoodKind::Tomato, 0, 2);
    world.add_content(plate, second).unwrap();
    assert!(completed(&book, "TwoTomatoes", &world, &pool(&world)));
}

#[test]
fn content_order_does_not_matter() {
    let book = RecipeBook::standard();
    let mut world = World::new(WorldConfig::default());

    let forward = plate(&mut world, 0, 0);
    let tomato = chopped(&mut world, FoodKind::Tomato, 0, 1);
    let lettuce = chopped(&mut world, FoodKind::Lettuce, 0, 2);
    world.add_content(forward, tomato).unwrap();
    world.add_content(forward, lettuce).unwrap();

    let reverse = plate(&mut world, 1, 0);
    let lettuce2 = chopped(&mut world, FoodKind::Lettuce, 1, 1);
    let tomato2 = chopped(&mut world, FoodKind::Tomato, 1, 2);
    world.add_content(reverse, lettuce2).unwrap();
    world.add_content(reverse, tomato2).unwrap();

    assert!(completed(&book, "TomatoLettucePlate", &world, &[forward]));
    assert!(completed(&book, "TomatoLettucePlate", &world, &[reverse]));
}

#[test]
fn partial_credit_counts_satisfied_nodes() {
    let book = RecipeBook::standard();
    let mut world = World::new(WorldConfig::default());
    let plate = plate(&mut world, 0, 0);
    let tomato = chopped(&mut world, FoodKind::Tomato, 0, 1);
    world.add_content(plate, tomato).unwrap();

    let recipe = evaluate(&book, "TomatoLettuceSalad", &world, &pool(&world));
    assert!(!recipe.completed());
    assert_eq!(recipe.satisfied_nodes().iter().copied().collect::<Vec<_>>(), vec![2]);
    assert_eq!(recipe.node_count(), 4);

    let goals = recipe.goals_completed(book.num_goals());
    assert_eq!(goals.len(), 33);
    assert!(goals[2]);
    assert!(!goals[0]);
    assert_eq!(goals.iter().filter(|done| **done).count(), 1);
}

#[test]
fn recipes_do_not_share_a_root_object() {
    let book = RecipeBook::standard();
    let mut world = World::new(WorldConfig::default());
    let first_plate = plate(&mut world, 0, 0);
    let tomato = chopped(&mut world, FoodKind::Tomato, 0, 1);
    world.add_content(first_plate, tomato).unwrap();

    let mut recipes = vec![
        book.recipe("TomatoSaladPlate").unwrap(),
        book.recipe("TomatoSaladPlate").unwrap(),
    ];
    let assigned = match_recipes(&mut recipes, &world, &pool(&world));
    assert_eq!(assigned, vec![Some(first_plate), None]);
    assert!(recipes[0].completed());
    assert!(!recipes[1].completed());
    // Partial credit is still reported for the unassigned instance.
    assert!(recipes[1].satisfied_nodes().contains(&12));

    let second_plate = plate(&mut world, 1, 0);
    let tomato2 = chopped(&mut world, FoodKind::Tomato, 1, 1);
    world.add_content(second_plate, tomato2).unwrap();
    let assigned = match_recipes(&mut recipes, &world, &pool(&world));
    assert_eq!(assigned, vec![Some(first_plate), Some(second_plate)]);
    assert!(recipes.iter().all(Recipe::completed));
}

#[test]
fn no_recipe_is_never_completed() {
    let book = RecipeBook::standard();
    let mut world = World::new(WorldConfig::default());
    world
        .place(ObjectKind::Deliversquare, Location::new(0, 0))
        .unwrap();
    world.place(ObjectKind::Floor, Location::new(0, 1)).unwrap();

    let mut recipe = book.recipe("no_recipe").unwrap();
    recipe.update_recipe_state(&world, &pool(&world));
    assert!(!recipe.completed());
    assert!(recipe.satisfied_nodes().contains(&31));
}

#[test]
fn unknown_recipe_names_are_reported() {
    let book = RecipeBook::standard();
    assert!(book.recipe("Lasagne").is_err());
    assert!(book.recipe_for_node("ChoppedEggplant").is_err());
}
