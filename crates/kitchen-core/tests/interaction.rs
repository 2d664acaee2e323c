use kitchen_core::objects::Plate;
use kitchen_core::{
    AgentAction, AgentError, ApplianceKind, ChopState, ContentError, Direction, FoodKind,
    Interaction, Location, ObjectId, ObjectKind, ToastState, World, WorldConfig, WorldError,
    WorldObject,
};

const AGENT_AT: Location = Location::new(1, 1);
const TARGET: Location = Location::new(1, 2);

fn facing_target(world: &mut World, arms: usize) -> ObjectId {
    let agent = world
        .add_agent_with_arms(AGENT_AT, "blue", "cook", arms)
        .unwrap();
    world
        .agent_mut(agent)
        .unwrap()
        .set_orientation(Direction::Right);
    agent
}

/// Place `kind` out of the way and put it in the agent's hands.
fn held(world: &mut World, agent: ObjectId, kind: ObjectKind, col: i32) -> ObjectId {
    let id = world.place(kind, Location::new(5, col)).unwrap();
    world.grab(agent, id, None).unwrap();
    id
}

fn content(world: &World, id: ObjectId) -> Vec<ObjectId> {
    world.get(id).unwrap().content_ids().to_vec()
}

fn interact(world: &mut World, agent: ObjectId, arm: Option<usize>) -> Interaction {
    world.resolve_action(agent, AgentAction::Interact { arm })
}

#[test]
fn held_food_goes_onto_a_loose_plate() {
    let mut world = World::new(WorldConfig::default());
    world.place(ObjectKind::Counter, TARGET).unwrap();
    let plate = world.spawn(|id| Plate::new(id, TARGET));
    let agent = facing_target(&mut world, 1);
    let lettuce = held(&mut world, agent, ObjectKind::Food(FoodKind::Lettuce), 0);
    world.chop(lettuce).unwrap();

    let outcome = interact(&mut world, agent, None);
    assert_eq!(
        outcome,
        Interaction::Merged {
            object: lettuce,
            into: plate
        }
    );
    assert_eq!(content(&world, plate), vec![lettuce]);
    assert!(world.agent(agent).unwrap().holding_empty(None));
    assert_eq!(world.get(lettuce).unwrap().location(), TARGET);
}

#[test]
fn held_plate_scoops_food_off_a_counter() {
    let mut world = World::new(WorldConfig::default());
    let counter = world.place(ObjectKind::Counter, TARGET).unwrap();
    let lettuce = world
        .place(ObjectKind::Food(FoodKind::Lettuce), TARGET)
        .unwrap();
    world.chop(lettuce).unwrap();
    assert_eq!(content(&world, counter), vec![lettuce]);

    let agent = facing_target(&mut world, 2);
    let tomato = held(&mut world, agent, ObjectKind::Food(FoodKind::Tomato), 0);
    let plate = held(&mut world, agent, ObjectKind::Plate, 1);

    let outcome = interact(&mut world, agent, None);
    assert_eq!(
        outcome,
        Interaction::Merged {
            object: lettuce,
            into: plate
        }
    );
    assert!(content(&world, counter).is_empty());
    assert_eq!(content(&world, plate), vec![lettuce]);
    assert_eq!(world.get(lettuce).unwrap().location(), AGENT_AT);
    assert_eq!(
        world.agent(agent).unwrap().holding(),
        &[Some(tomato), Some(plate)]
    );
}

#[test]
fn lower_arm_wins_when_both_held_items_fit() {
    let mut world = World::new(WorldConfig::default());
    let counter = world.place(ObjectKind::Counter, TARGET).unwrap();
    let agent = facing_target(&mut world, 2);
    let lettuce = held(&mut world, agent, ObjectKind::Food(FoodKind::Lettuce), 0);
    let tomato = held(&mut world, agent, ObjectKind::Food(FoodKind::Tomato), 1);

    let outcome = interact(&mut world, agent, None);
    assert_eq!(
        outcome,
        Interaction::Dropped {
            object: lettuce,
            onto: counter
        }
    );
    assert_eq!(content(&world, counter), vec![lettuce]);
    assert_eq!(world.agent(agent).unwrap().holding(), &[None, Some(tomato)]);
}

#[test]
fn lower_arm_drop_beats_a_higher_arm_scoop() {
    let mut world = World::new(WorldConfig::default());
    let toaster = world
        .place(ObjectKind::Appliance(ApplianceKind::Toaster), TARGET)
        .unwrap();
    let toast = world.place(ObjectKind::Food(FoodKind::Bread), TARGET).unwrap();
    world.run_action(toaster).unwrap();
    world.progress_all();
    world.progress_all();
    assert_eq!(world.food(toast).unwrap().toast_state(), Some(ToastState::Toasted));

    let agent = facing_target(&mut world, 2);
    let bread = held(&mut world, agent, ObjectKind::Food(FoodKind::Bread), 0);
    let plate = held(&mut world, agent, ObjectKind::Plate, 1);

    // The plate could take the toast, but arm 0 fits first.
    let outcome = interact(&mut world, agent, None);
    assert_eq!(
        outcome,
        Interaction::Dropped {
            object: bread,
            onto: toaster
        }
    );
    assert_eq!(content(&world, toaster), vec![toast, bread]);
    assert!(content(&world, plate).is_empty());
    assert_eq!(world.agent(agent).unwrap().holding(), &[None, Some(plate)]);
}

#[test]
fn explicit_arm_restricts_the_drop() {
    let mut world = World::new(WorldConfig::default());
    let counter = world.place(ObjectKind::Counter, TARGET).unwrap();
    let agent = facing_target(&mut world, 2);
    let _lettuce = held(&mut world, agent, ObjectKind::Food(FoodKind::Lettuce), 0);
    let tomato = held(&mut world, agent, ObjectKind::Food(FoodKind::Tomato), 1);

    let outcome = interact(&mut world, agent, Some(1));
    assert_eq!(
        outcome,
        Interaction::Dropped {
            object: tomato,
            onto: counter
        }
    );
}

#[test]
fn free_arm_grabs_the_tip_of_a_counter() {
    let mut world = World::new(WorldConfig::default());
    let counter = world.place(ObjectKind::Counter, TARGET).unwrap();
    let tomato = world
        .place(ObjectKind::Food(FoodKind::Tomato), TARGET)
        .unwrap();
    let agent = facing_target(&mut world, 1);

    let outcome = interact(&mut world, agent, None);
    assert_eq!(
        outcome,
        Interaction::Grabbed {
            object: tomato,
            arm: 0
        }
    );
    assert!(content(&world, counter).is_empty());
    assert!(world.get(tomato).unwrap().is_free());
    assert_eq!(world.get(tomato).unwrap().location(), AGENT_AT);
}

#[test]
fn interact_falls_back_to_the_station_action() {
    let mut world = World::new(WorldConfig::default());
    let cutboard = world.place(ObjectKind::Cutboard, TARGET).unwrap();
    let lettuce = world
        .place(ObjectKind::Food(FoodKind::Lettuce), TARGET)
        .unwrap();
    let agent = facing_target(&mut world, 1);
    held(&mut world, agent, ObjectKind::Plate, 0);

    let outcome = interact(&mut world, agent, None);
    assert_eq!(
        outcome,
        Interaction::Executed {
            station: cutboard,
            created: vec![],
            removed: vec![]
        }
    );
    assert_eq!(world.food(lettuce).unwrap().chop_state(), Some(ChopState::Chopped));

    // Chopped lettuce is done, so the held plate now takes it.
    let outcome = interact(&mut world, agent, None);
    assert!(matches!(outcome, Interaction::Merged { object, .. } if object == lettuce));
}

#[test]
fn execute_chops_bread_into_two_slices() {
    let mut world = World::new(WorldConfig::default());
    let cutboard = world.place(ObjectKind::Cutboard, TARGET).unwrap();
    let bread = world
        .place(ObjectKind::Food(FoodKind::Bread), TARGET)
        .unwrap();
    let agent = facing_target(&mut world, 1);

    let outcome = world.resolve_action(agent, AgentAction::Execute { arm: None });
    let Interaction::Executed { created, .. } = &outcome else {
        panic!("expected the cutboard to run, got {outcome:?}");
    };
    assert_eq!(created.len(), 1);
    let slice = created[0];
    assert_eq!(content(&world, cutboard), vec![bread, slice]);
    assert!(!world.get(bread).unwrap().is_free());
    assert!(world.get(slice).unwrap().is_free());

    // The board is spent until emptied.
    assert_eq!(
        world.resolve_action(agent, AgentAction::Execute { arm: None }),
        Interaction::NoOp
    );
}

#[test]
fn execute_needs_a_free_arm() {
    let mut world = World::new(WorldConfig::default());
    world.place(ObjectKind::Cutboard, TARGET).unwrap();
    world
        .place(ObjectKind::Food(FoodKind::Onion), TARGET)
        .unwrap();
    let agent = facing_target(&mut world, 1);
    held(&mut world, agent, ObjectKind::Plate, 0);

    assert_eq!(
        world.resolve_action(agent, AgentAction::Execute { arm: None }),
        Interaction::NoOp
    );
}

#[test]
fn another_agent_in_the_way_blocks_interaction() {
    let mut world = World::new(WorldConfig::default());
    world
        .place(ObjectKind::Food(FoodKind::Apple), TARGET)
        .unwrap();
    world.add_agent(TARGET, "red", "other").unwrap();
    let agent = facing_target(&mut world, 1);

    assert_eq!(interact(&mut world, agent, None), Interaction::NoOp);
    assert!(world.agent(agent).unwrap().holding_empty(None));
}

#[test]
fn held_items_are_not_grabbed_by_others() {
    let mut world = World::new(WorldConfig::default());
    let agent = facing_target(&mut world, 1);
    let other = world.add_agent(Location::new(3, 3), "red", "other").unwrap();
    let apple = held(&mut world, agent, ObjectKind::Food(FoodKind::Apple), 0);

    assert_eq!(
        world.grab(other, apple, None),
        Err(WorldError::Content(ContentError::ReleaseRefused(agent)))
    );
}

#[test]
fn arms_fill_in_order_and_reject_a_third_item() {
    let mut world = World::new(WorldConfig::default());
    let counter = world.place(ObjectKind::Counter, TARGET).unwrap();
    let agent = facing_target(&mut world, 2);
    let first = world.place(ObjectKind::Food(FoodKind::Tomato), Location::new(4, 0)).unwrap();
    let second = world.place(ObjectKind::Food(FoodKind::Tomato), Location::new(4, 1)).unwrap();
    let third = world.place(ObjectKind::Food(FoodKind::Tomato), Location::new(4, 2)).unwrap();

    assert_eq!(world.grab(agent, first, None), Ok(0));
    assert_eq!(world.grab(agent, second, None), Ok(1));
    assert_eq!(
        world.grab(agent, third, None),
        Err(WorldError::Agent(AgentError::NoFreeArm))
    );
    assert_eq!(
        world.put_down(agent, third, None, counter),
        Err(WorldError::Agent(AgentError::NotHeld(third)))
    );
    assert_eq!(world.get(third).unwrap().location(), Location::new(4, 2));
}

#[test]
fn explicit_arm_is_honoured_for_grab_and_put_down() {
    let mut world = World::new(WorldConfig::default());
    let counter = world.place(ObjectKind::Counter, TARGET).unwrap();
    let agent = facing_target(&mut world, 2);
    let first = world.place(ObjectKind::Food(FoodKind::Onion), Location::new(4, 0)).unwrap();
    let second = world.place(ObjectKind::Food(FoodKind::Onion), Location::new(4, 1)).unwrap();

    assert_eq!(world.grab(agent, first, Some(0)), Ok(0));
    assert_eq!(
        world.grab(agent, second, Some(0)),
        Err(WorldError::Agent(AgentError::NoFreeArm))
    );
    assert_eq!(world.grab(agent, second, Some(1)), Ok(1));

    // Wrong arm: nothing moves.
    assert_eq!(world.put_down(agent, first, Some(1), counter), Ok(false));
    assert_eq!(
        world.agent(agent).unwrap().holding(),
        &[Some(first), Some(second)]
    );
    assert!(content(&world, counter).is_empty());

    assert_eq!(world.put_down(agent, first, Some(0), counter), Ok(true));
    assert_eq!(content(&world, counter), vec![first]);
    assert_eq!(world.agent(agent).unwrap().holding(), &[None, Some(second)]);
}

#[test]
fn rejected_actions_resolve_to_noop() {
    let mut world = World::new(WorldConfig::default());
    let agent = facing_target(&mut world, 1);
    assert_eq!(interact(&mut world, agent, Some(7)), Interaction::NoOp);
    assert_eq!(
        world.resolve_action(ObjectId(999), AgentAction::Interact { arm: None }),
        Interaction::NoOp
    );
}
