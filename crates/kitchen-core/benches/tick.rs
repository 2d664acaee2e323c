use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kitchen_core::{
    match_recipes, AgentAction, ApplianceKind, Direction, FoodKind, Location, ObjectId, ObjectKind,
    RecipeBook, World, WorldConfig,
};

/// A row of blenders and counters with two agents pacing between them.
fn busy_kitchen() -> (World, Vec<ObjectId>) {
    let mut world = World::new(WorldConfig::default().with_bounds(16, 16));
    for col in 0..16 {
        let kind = if col % 2 == 0 {
            ObjectKind::Appliance(ApplianceKind::Blender)
        } else {
            ObjectKind::Counter
        };
        world.place(kind, Location::new(0, col)).unwrap();
        world
            .place(ObjectKind::Food(FoodKind::Banana), Location::new(0, col))
            .unwrap();
    }
    let agents = vec![
        world.add_agent(Location::new(2, 2), "blue", "a").unwrap(),
        world.add_agent(Location::new(3, 8), "red", "b").unwrap(),
    ];
    (world, agents)
}

fn bench_tick(c: &mut Criterion) {
    let (mut world, agents) = busy_kitchen();
    let mut tick: u64 = 0;

    c.bench_function("kitchen/tick(agents=2, stations=16)", |b| {
        b.iter(|| {
            let direction = if tick % 2 == 0 {
                Direction::Left
            } else {
                Direction::Right
            };
            let actions: Vec<(ObjectId, AgentAction)> = agents
                .iter()
                .map(|agent| (*agent, AgentAction::Move { direction }))
                .collect();
            black_box(world.tick(&actions));
            tick = tick.wrapping_add(1);
        })
    });
}

fn bench_match(c: &mut Criterion) {
    let book = RecipeBook::standard();
    let mut world = World::new(WorldConfig::default().with_bounds(16, 16));
    for col in 0..16 {
        let plate = world.place(ObjectKind::Plate, Location::new(1, col)).unwrap();
        for kind in [FoodKind::Tomato, FoodKind::Lettuce, FoodKind::Onion] {
            let food = world
                .place(ObjectKind::Food(kind), Location::new(2, col))
                .unwrap();
            world.chop(food).unwrap();
            world.add_content(plate, food).unwrap();
        }
    }
    let pool: Vec<ObjectId> = world.objects().ids().collect();
    let mut recipes: Vec<_> = ["TomatoLettuceOnionPlate", "TomatoLettucePlate", "TomatoSaladPlate"]
        .into_iter()
        .map(|name| book.recipe(name).unwrap())
        .collect();

    c.bench_function("kitchen/match_recipes(plates=16, recipes=3)", |b| {
        b.iter(|| black_box(match_recipes(&mut recipes, &world, &pool)))
    });
}

criterion_group!(benches, bench_tick, bench_match);
criterion_main!(benches);
