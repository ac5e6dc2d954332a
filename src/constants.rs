// Copyright 2023 Datafuse Labs.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// The 201st nested `{` or `[` fails with `MaxObjectArrayDepth`.
pub(crate) const MAX_DEPTH: usize = 200;

// Initial capacity of the JSON output buffer.
pub(crate) const OUTPUT_INIT_CAPACITY: usize = 1024;

// Duration suffix multipliers, in seconds.
pub(crate) const SECONDS_PER_WEEK: f64 = 3600.0 * 24.0 * 7.0;
pub(crate) const SECONDS_PER_DAY: f64 = 3600.0 * 24.0;
pub(crate) const SECONDS_PER_HOUR: f64 = 3600.0;
pub(crate) const SECONDS_PER_MINUTE: f64 = 60.0;

// Numeric expression results with no fractional part below this magnitude
// are printed as integers (16 significant digits fit losslessly).
pub(crate) const INTEGER_PRINT_LIMIT: f64 = 1e16;
