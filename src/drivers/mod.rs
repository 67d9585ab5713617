// Hardware drivers, board-independent.
//
// Trait side builds everywhere; chip impls sit behind the `esp32c3`
// feature.

pub mod serial;
