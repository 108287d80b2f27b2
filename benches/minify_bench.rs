//! Minifier throughput, per stage and end to end.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use jsz::MinifyOptions;
use jsz::minify;

// =============================================================================
// Test Sources
// =============================================================================

const SMALL_SOURCE: &str = r#"
function add(first, second) {
    var unused = 0;
    return first + second;
}
console.log(add(1, 2));
"#;

const MEDIUM_SOURCE: &str = r#"
(function (root) {
    var DEBUG = false;
    var cache = {};

    function memoize(key, compute) {
        if (DEBUG) {
            console.log("lookup", key);
        }
        if (!(key in cache)) {
            cache[key] = compute(key);
        }
        return cache[key];
    }

    class Registry {
        constructor() {
            this.entries = [];
        }
        register(name, factory) {
            var entry = { name: name, factory: factory };
            this.entries.push(entry);
            return entry;
        }
        resolve(name) {
            for (var i = 0; i < this.entries.length; i++) {
                if (this.entries[i].name === name) {
                    return memoize(name, this.entries[i].factory);
                }
            }
            return undefined;
        }
    }

    root.registry = new Registry();
})(this);
"#;

fn large_source() -> String {
    let mut source = String::new();
    for i in 0..200 {
        source.push_str(&format!(
            "function handler{i}(event, context) {{\n\
             \x20   var local = event.value * {i};\n\
             \x20   var ignored = context.flag;\n\
             \x20   if (false) {{ return null; }}\n\
             \x20   return local + context.offset;\n\
             }}\n\
             exportsList.push(handler{i});\n"
        ));
    }
    source
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_minify(c: &mut Criterion) {
    let large = large_source();
    let sources = [("small", SMALL_SOURCE), ("medium", MEDIUM_SOURCE), ("large", large.as_str())];

    let mut default_options = MinifyOptions::default();
    default_options.compress.passes = 2;
    let mut compress_only = MinifyOptions::default();
    compress_only.mangle.enabled = false;
    let mut mangle_only = MinifyOptions::default();
    mangle_only.compress.enabled = false;

    let mut group = c.benchmark_group("minify");
    for (name, source) in sources {
        group.throughput(Throughput::Bytes(source.len() as u64));
        for (stage, options) in [
            ("full", &default_options),
            ("compress", &compress_only),
            ("mangle", &mangle_only),
        ] {
            group.bench_with_input(BenchmarkId::new(stage, name), source, |b, source| {
                b.iter(|| minify("bench.js", black_box(source), options).map(|output| output.code.len()))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_minify);
criterion_main!(benches);
