use fibre_di::{global, params, resolve, Provider};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

// Wraps the tracker it was built with.
struct RequestLog {
  tracker: Arc<RequestTracker>,
}

static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn main() {
  // This factory will only be called ONCE, however often the service is requested.
  global()
    .register(
      "RequestTracker",
      Provider::function(Vec::new(), |_| {
        println!("Creating RequestTracker...");
        Ok(RequestTracker {
          id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
        })
      }),
    )
    .unwrap();

  // `request_tracker` asks for the `RequestTracker` service.
  global()
    .register(
      "RequestLog",
      Provider::function(params![request_tracker], |args| {
        Ok(RequestLog {
          tracker: args.arg(0)?,
        })
      }),
    )
    .unwrap();

  println!("--- Resolving ---");
  let log = resolve!(RequestLog, "RequestLog");
  let t1 = resolve!(RequestTracker, "RequestTracker");
  let t2 = resolve!(RequestTracker, "RequestTracker");
  println!("Tracker IDs: {}, {}, {}", log.tracker.id, t1.id, t2.id);

  assert_eq!(t1.id, 0);
  assert!(Arc::ptr_eq(&t1, &t2), "Singleton instances should be identical");
  assert!(Arc::ptr_eq(&log.tracker, &t1), "The log should hold the same tracker");
  println!("All three are the same instance, as expected.");
}
