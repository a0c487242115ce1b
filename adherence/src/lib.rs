/*!
Adherence metrics for strategic-planning axes.

Each axis of a planning workbook is a [Table] with one row per goal. Two views are computed from it:

* [summarize] averages the `population` and `diagnosis` columns into an [AdherenceSummary],
  the data behind the radar chart. The government axis is pinned at 100%.
* [reshape] sorts the goals by `adherence`, classifies them into [AdherenceLevel]s and lays
  them out as [LongFormRow]s for the correspondence chart.

Both functions only fail with a [MissingColumnsError], which concerns a single chart of a
single axis.

```
use adherence::builder::TableBuilder;
use adherence::{reshape, AdherenceLevel};

let mut builder = TableBuilder::new(&["governo", "populacao", "diagnostico", "aderencia"]);
builder.add_goal("A", 1.0, 1.0, 1.0);
builder.add_goal("B", 1.0, 1.0, 0.0);

let res = reshape(&builder.build())?;
assert_eq!(res.group_text(AdherenceLevel::High), "A");
# Ok::<(), adherence::MissingColumnsError>(())
```
*/

mod config;
mod reshape;
mod summary;

pub mod builder;
pub mod manual;

pub use crate::config::*;
pub use crate::reshape::*;
pub use crate::summary::*;
