/*!
# Graph Algorithms

Algorithms built on top of the capability traits in [`ops`](crate::ops).
All algorithms are re-exported at the top level of this module, so you can simply do:
```rust
use idgraphs::algo::*;
```
*/

mod subgraph;

use tracing::debug;

use crate::prelude::*;

pub use subgraph::*;
