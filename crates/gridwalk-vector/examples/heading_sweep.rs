use gridwalk_vector::*;

fn main() {
    let speed = 100.0;
    let mut velocity = PolarVector::new(speed, 0.0);

    println!("Sweeping a {} px/s velocity through a full turn:", speed);
    for step in 0..=8 {
        velocity.set_direction(step as f32 * 45.0);
        println!(
            "  {:>6.1}° -> vx: {:>8.3}, vy: {:>8.3}  {}",
            velocity.direction(),
            velocity.x(),
            velocity.y(),
            velocity
        );
    }

    // Cartesian input round-trips through the polar form
    let from_xy = PolarVector::from_cartesian(32.0, 30.0);
    println!("\n(32, 30) as polar: {}", from_xy);
    velocity.set_magnitude(speed / 2.0);
    println!("Half speed at {:.1}°: ({:.3}, {:.3})", velocity.direction(), velocity.x(), velocity.y());
}
