use anyhow::{Context, Result};
use histogram_localizer::common::types::format_beliefs;
use histogram_localizer::lifecycle::LifecycleNode;
use histogram_localizer::{Displacement, Grid, LocalizerConfig, PerceptionStack, Simulation};
use log::info;

fn world() -> Result<Grid<char>> {
    let grid = Grid::from_rows(vec![
        vec!['r', 'g', 'g', 'r', 'r'],
        vec!['r', 'r', 'g', 'r', 'r'],
        vec!['r', 'r', 'g', 'g', 'r'],
        vec!['r', 'r', 'r', 'r', 'r'],
    ])?;
    Ok(grid)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Scripted run through the lifecycle-managed stack
    let mut stack = PerceptionStack::new(world()?, LocalizerConfig::default())?;
    stack.set_parameter("p_hit", 0.6);
    stack.set_parameter("p_miss", 0.2);
    stack.set_parameter("blurring", 0.1);
    stack
        .on_configure()
        .context("Failed to configure perception stack")?;
    stack.on_activate()?;

    let script = [
        ('g', Displacement::RIGHT),
        ('g', Displacement::DOWN),
        ('g', Displacement::DOWN),
        ('g', Displacement::RIGHT),
    ];
    for (color, displacement) in script {
        stack.sense(&color)?;
        stack.update(displacement)?;
    }
    println!("Scripted belief after {} steps:", script.len());
    print!("{}", format_beliefs(stack.beliefs(), 3));
    println!("Most likely cell: {:?}", stack.get_pose());

    stack.on_deactivate()?;
    stack.on_cleanup()?;
    stack.shutdown();

    // Random run with a hidden true pose
    let config = LocalizerConfig::default();
    let mut simulation = Simulation::new(world()?, config, (1, 2), 2024)?;
    let num_steps = 20;
    simulation.run(num_steps)?;
    simulation.sense()?;

    info!(
        "Simulated {} steps: true pose {:?}, estimate {:?}",
        num_steps,
        simulation.true_pose(),
        simulation.estimate()
    );
    println!("Simulated belief after {} steps:", num_steps);
    print!("{}", format_beliefs(simulation.localizer().beliefs(), 3));
    println!(
        "True pose: {:?}, estimate: {:?} (p = {:.3})",
        simulation.true_pose(),
        simulation.estimate(),
        simulation.localizer().confidence()
    );

    Ok(())
}
