//==============================================================================
// Concurrency - threads, channels, locks, atomics, wait groups and select
//==============================================================================

use std::time::Duration;

use anyhow::Context;
use colored::Colorize;
use course_lab::concurrency::{atomic, channels, mutex, select, threads, waitgroup};
use course_lab::logging::{init_logger, verbose_from_args};
use course_lab::CourseConfig;

fn section(title: &str) {
    println!("\n{}", format!("=== {title} ===").bold().cyan());
}

fn print_all<T: std::fmt::Display>(lines: impl IntoIterator<Item = T>) {
    for line in lines {
        println!("{line}");
    }
}

fn main() -> anyhow::Result<()> {
    init_logger(verbose_from_args());
    let _config = CourseConfig::load_validated().context("loading configuration")?;

    println!("{}", "Concurrency".bold().green());

    section("Threads");
    println!("{}", threads::spawn_and_join());
    println!("{}", threads::thread_with_parameter(42));
    let (started, finished) = threads::multiple_workers(3);
    print_all(started.iter().chain(finished.iter()));
    println!("{}", threads::panic_in_thread());

    section("Channels");
    println!("{}", channels::unbuffered());
    println!("buffered: {:?}", channels::buffered());
    println!("generator: {:?}", channels::generator(5));
    print_all(channels::timeouts(Duration::from_millis(50)));

    section("Mutex");
    println!("counter: {}", mutex::counter(10));
    let (data, reads) = mutex::readers_and_writer();
    println!("data: {data:?}, reads per reader: {reads:?}");
    print_all(mutex::ordered_locking(2));
    println!("try_lock twice: {:?}", mutex::try_lock_twice());

    section("Atomics");
    println!("atomic counter: {}", atomic::counter(10, 1000));
    println!("flag transitions: {:?}", atomic::bool_flag());
    let (before, after) = atomic::config_swap();
    println!("config swap: {before:?} -> {after:?}");

    section("Wait groups");
    print_all(waitgroup::basic(3));
    let (ok, errors) = waitgroup::collect_errors(4, 1);
    println!("succeeded: {ok:?}");
    print_all(errors);
    println!(
        "finished in time: {}",
        waitgroup::wait_with_timeout(3, Duration::from_millis(10), Duration::from_millis(500))
    );

    section("Select");
    println!("{}", select::basic());
    println!("{}", select::with_default());
    println!("{}", select::with_timeout(Duration::from_millis(50)));
    println!("three channels: {:?}", select::three_channels());
    print_all(select::closure_detection(3));
    Ok(())
}
