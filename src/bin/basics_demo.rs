//==============================================================================
// Language Basics - variables, control flow, functions and data structures
//==============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context;
use colored::Colorize;
use course_lab::basics::{constants, type_conversion, type_inference, variables, zero_values};
use course_lab::control_flow::{break_continue, for_loops, if_statements, switch_statements};
use course_lab::data_structures::{arrays_slices, maps, structs};
use course_lab::data_structures::structs::Shape;
use course_lab::functions::{advanced_concepts, basic_functions, function_types};
use course_lab::logging::{init_logger, verbose_from_args};
use course_lab::CourseConfig;

fn section(title: &str) {
    println!("\n{}", format!("=== {title} ===").bold().cyan());
}

fn basics() {
    section("Variables");
    for line in variables::Profile::default().describe() {
        println!("{line}");
    }
    let (number, text) = variables::shadowing();
    println!("shadowed: {number}, {text}");

    section("Constants");
    println!("{} (PI = {}, max = {})", constants::GREETING, constants::PI, constants::MAX_VALUE);
    println!("{}", constants::temperature_conversion());

    section("Type conversion");
    println!("{:?}", type_conversion::numeric_conversions());
    match type_conversion::parse_number(" 42 ") {
        Ok(n) => println!("parsed {n}"),
        Err(err) => println!("parse failed: {err}"),
    }
    let boiling: type_conversion::Fahrenheit = type_conversion::Celsius(100.0).into();
    println!("100C = {}F", boiling.0);

    section("Type inference");
    for (value, ty) in type_inference::inferred_types() {
        println!("{value:>12} : {ty}");
    }

    section("Zero values");
    for line in zero_values::zero_report().lines() {
        println!("{line}");
    }
}

fn control_flow() {
    section("If");
    for score in [95, 72, 40] {
        println!("{score}: {} ({})", if_statements::letter_grade(score), if_statements::pass_fail(score));
    }
    println!("{}", if_statements::weather_report(28, 75));

    section("Match");
    for day in ["Saturday", "Tuesday"] {
        println!("{day}: {}", switch_statements::day_kind(day));
    }
    println!("B feedback: {:?}", switch_statements::fallthrough_feedback("B"));
    println!("{}", switch_statements::classify_char('7'));

    section("Loops");
    println!("{:?}", for_loops::counted_loop());
    println!("{:?}", for_loops::range_over_string("héllo"));
    println!("labeled break: {:?}", break_continue::labeled_break());
    println!("first square above 50: {}", break_continue::first_square_above(50));
}

fn functions() {
    section("Functions");
    println!("{}", basic_functions::greet("Rustacean"));
    println!("sum: {}", basic_functions::sum(&[1, 2, 3, 4, 5]));
    match basic_functions::divide(10.0, 0.0) {
        Ok(q) => println!("quotient: {q}"),
        Err(err) => println!("divide failed: {err}"),
    }
    println!("apply: {}", basic_functions::apply_operation(6, 7, |a, b| a * b));

    section("Closures");
    let mut counter = function_types::create_counter();
    println!("counter: {} {} {}", counter(), counter(), counter());
    println!("square(9) = {}", function_types::SQUARE(9));

    section("Defer and recover");
    let log: advanced_concepts::DeferLog = Rc::new(RefCell::new(Vec::new()));
    advanced_concepts::defer_example(&log);
    for line in log.borrow().iter() {
        println!("{line}");
    }
    println!("{}", advanced_concepts::recover_from_panic());
    let composed = advanced_concepts::compose(advanced_concepts::add_one, advanced_concepts::multiply_by_two);
    println!("compose(5) = {}", composed(5));
}

fn data_structures() {
    section("Arrays and slices");
    println!("{:?}", arrays_slices::append_values());
    println!("transposed: {:?}", arrays_slices::transpose(&arrays_slices::matrix()));

    section("Maps");
    println!("{:?}", maps::scores());
    println!("{:?}", maps::parity_groups(&[1, 2, 3, 4, 5, 6]));
    println!("{:?}", maps::apply("mul", 6, 7));

    section("Structs");
    let shapes: Vec<Box<dyn Shape>> = vec![
        Box::new(structs::Rectangle { width: 3.0, height: 4.0 }),
        Box::new(structs::Circle { radius: 1.5 }),
    ];
    for line in structs::shape_areas(&shapes) {
        println!("{line}");
    }
    println!("{:?}", structs::sample_car());
}

fn main() -> anyhow::Result<()> {
    init_logger(verbose_from_args());
    let _config = CourseConfig::load_validated().context("loading configuration")?;

    println!("{}", "Language Basics".bold().green());
    basics();
    control_flow();
    functions();
    data_structures();
    Ok(())
}
