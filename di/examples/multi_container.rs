use fibre_di::{global, Container};

// A function that configures dependencies and runs some logic.
// By accepting a `&Container`, it can be tested with a controlled environment.
fn process_data(container: &Container) -> String {
  // Register a data source ONLY within the scope of this container.
  container
    .register_instance("DataSource", "test data".to_string())
    .expect("Data source registered twice");

  let data = container
    .get_as::<String>("DataSource")
    .expect("Data not found in container");
  format!("Processed: {}", data.to_uppercase())
}

fn main() {
  println!("--- Running with a local container ---");
  let test_container = Container::new();
  let result = process_data(&test_container);

  println!("Result: {}", result);
  assert_eq!(result, "Processed: TEST DATA");

  // The service registered in `test_container` should NOT exist in the global container.
  assert!(
    !global().is_registered("DataSource"),
    "Dependency should not have leaked into the global container!"
  );

  println!("\nVerified that the local container is isolated from the global one.");
}
