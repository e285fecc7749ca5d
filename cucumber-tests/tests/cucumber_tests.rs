use cucumber::World;
use cucumber_tests::features::world::FormstoreWorld;

#[tokio::main]
async fn main() {
    // Every scenario starts its own server on an ephemeral port.
    FormstoreWorld::cucumber().run_and_exit("features/").await;
}
