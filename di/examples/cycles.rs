use fibre_di::{params, Container, Error, Provider};

fn unit(params: Vec<fibre_di::Param>) -> Provider {
  Provider::function(params, |_| Ok(()))
}

fn main() {
  let container = Container::new();

  // Orders -> Billing -> Customers -> Orders
  container.register("Orders", unit(params![billing])).unwrap();
  container.register("Billing", unit(params![customers])).unwrap();
  container.register("Customers", unit(params![orders])).unwrap();

  // An unrelated cycle that nobody asks for.
  container.register("Ping", unit(params![pong])).unwrap();
  container.register("Pong", unit(params![ping])).unwrap();

  // A service outside both cycles.
  container.register("Clock", unit(Vec::new())).unwrap();

  match container.get("Orders") {
    Err(Error::CyclicDependency { name, chain }) => {
      println!("Cycle at '{}': {}", name, chain.join(" -> "));
    }
    other => panic!("Expected a cycle, got {:?}", other.map(|_| ())),
  }

  // Validation is rooted at the requested service, so this still works.
  assert!(container.get("Clock").is_ok());
  println!("'Clock' resolved despite the cycles elsewhere.");

  // A full check reports the first cycle in name order.
  if let Err(e) = container.validate() {
    println!("Full validation: {}", e);
  }
}
