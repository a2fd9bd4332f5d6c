use fibre_di::{global, params, resolve, Provider};
use std::panic;

struct Report;

fn main() {
  // `Report` needs a `DataSource` that nobody registers.
  global()
    .register(
      "Report",
      Provider::function(params![data_source], |_| Ok(Report)),
    )
    .unwrap();

  // --- Using the panicking `resolve!` macro ---
  println!("Attempting to resolve a service whose dependency is missing...");

  let result = panic::catch_unwind(|| {
    // This line will panic!
    let _report = resolve!(Report, "Report");
  });

  assert!(result.is_err(), "resolve! should have panicked.");
  println!("Successfully caught the expected panic from resolve!.");

  // --- Using the fallible `get()` method ---
  println!("\nNow, attempting to resolve using the fallible `get()` method...");

  match global().get("Report") {
    Ok(_) => panic!("Should not have built the service!"),
    Err(e) => {
      assert!(e.is_missing());
      println!("Correctly received an error: {}", e);
    }
  }
}
