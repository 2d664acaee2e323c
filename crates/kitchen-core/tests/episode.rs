use kitchen_core::{
    AgentAction, Direction, Episode, FoodKind, Interaction, Location, ObjectId, ObjectKind,
    RecipeBook, World, WorldConfig,
};

/// A cook holding a plated, chopped tomato one step left of a delivery square.
fn kitchen() -> (Episode, ObjectId, ObjectId) {
    let mut world = World::new(WorldConfig::default().with_bounds(5, 5));
    let square = world
        .place(ObjectKind::Deliversquare, Location::new(1, 3))
        .unwrap();
    let agent = world.add_agent(Location::new(1, 1), "blue", "cook").unwrap();
    let plate = world.place(ObjectKind::Plate, Location::new(3, 3)).unwrap();
    let tomato = world
        .place(ObjectKind::Food(FoodKind::Tomato), Location::new(3, 4))
        .unwrap();
    world.chop(tomato).unwrap();
    world.add_content(plate, tomato).unwrap();
    world.grab(agent, plate, None).unwrap();

    let book = RecipeBook::standard();
    let recipes = vec![
        book.recipe("TomatoSalad").unwrap(),
        book.recipe("TomatoLettuceSalad").unwrap(),
    ];
    (Episode::new(world, recipes), agent, square)
}

#[test]
fn delivering_a_dish_completes_its_recipe() {
    let (mut episode, agent, square) = kitchen();

    let report = episode.step(&[(agent, AgentAction::Move { direction: Direction::Right })]);
    assert_eq!(report.tick, 1);
    assert_eq!(
        report.interactions,
        vec![(agent, Interaction::Moved { to: Location::new(1, 2) })]
    );
    assert!(!report.recipes[0].completed);
    // Chopped tomato and its plate already count.
    assert_eq!(report.recipes[0].satisfied_nodes, 2);
    assert_eq!(report.recipes[0].total_nodes, 3);

    let report = episode.step(&[(agent, AgentAction::Interact { arm: None })]);
    assert_eq!(report.tick, 2);
    assert!(report.recipes[0].completed);
    assert_eq!(report.recipes[0].assigned, Some(square));
    assert_eq!(report.recipes[0].name, "TomatoSalad");
    assert!(!report.recipes[1].completed);
    assert!(!report.all_completed());
    assert!(!episode.is_complete());
    assert_eq!(report.delivered, 0);
    assert_eq!(episode.tick_count(), 2);
}

#[test]
fn evaluation_without_ticking_keeps_the_clock() {
    let (mut episode, _, _) = kitchen();
    let progress = episode.evaluate();
    assert_eq!(progress.len(), 2);
    assert!(progress.iter().all(|recipe| !recipe.completed));
    assert_eq!(episode.tick_count(), 0);
    assert_eq!(episode.recipes().len(), 2);
}
