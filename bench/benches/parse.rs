use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use kang_bench::expression_source;
use kang_core::{BufLog, Parser, Tokenizer};
use kang_lexer::Lexer;

const GRAMMAR: &str = r#"
    <grammar start="program">
      <terminal name="identifier"/>
      <terminal name="+"/>
      <terminal name="×"/>
      <terminal name="end of line" discard="yes"/>

      <variable name="program">
        <rule>
          <variable>expression</variable>
          <terminal>end of line</terminal>
        </rule>
      </variable>

      <variable name="expression">
        <ordered-by-precedence>
          <group associativity="left">
            <rule>
              <variable>expression</variable>
              <terminal>+</terminal>
              <variable>expression</variable>
            </rule>
          </group>
          <group associativity="left">
            <rule>
              <variable>expression</variable>
              <terminal>×</terminal>
              <variable>expression</variable>
            </rule>
          </group>
        </ordered-by-precedence>
        <rule><terminal>identifier</terminal></rule>
      </variable>
    </grammar>
"#;

fn table_generation(c: &mut Criterion) {
    c.bench_function("build_tables", |b| {
        b.iter(|| Parser::build(kang_grammar::load(GRAMMAR).unwrap()).unwrap())
    });
}

fn parsing(c: &mut Criterion) {
    let parser = Parser::build(kang_grammar::load(GRAMMAR).unwrap()).unwrap();

    for terms in [16, 256, 4096] {
        let source = expression_source(terms);

        c.bench_with_input(
            BenchmarkId::new("parse_expression", terms),
            &source,
            |b, source| {
                b.iter(|| {
                    let lexer = Lexer::new(source.chars(), BufLog::new());
                    let mut tokenizer = Tokenizer::new(lexer);
                    parser.parse(&mut tokenizer).unwrap().unwrap()
                })
            },
        );
    }
}

criterion_group!(benches, table_generation, parsing);
criterion_main!(benches);
