//! End-to-end tests driving the whole front-end: an XML grammar
//! description through table generation, the Kang lexer, and the parser.

#[cfg(test)]
mod tests {
    use kang_core::{BufLog, Node, ParseTree, Parser, Token, Tokenizer};
    use kang_lexer::{KangToken, Lexer};

    const ARITHMETIC: &str = r#"
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

    const STATEMENTS: &str = r#"
        <grammar start="program">
          <terminal name="identifier"/>
          <terminal name="integer"/>
          <terminal name="="/>
          <terminal name="if"/>
          <terminal name="end of line" discard="yes"/>
          <terminal name="open block" discard="yes"/>
          <terminal name="close block" discard="yes"/>

          <variable name="program">
            <rule>
              <repeat min="1"><variable>statement</variable></repeat>
            </rule>
          </variable>

          <variable name="statement">
            <rule>
              <terminal>identifier</terminal>
              <terminal>=</terminal>
              <variable>expression</variable>
              <terminal>end of line</terminal>
            </rule>
            <rule>
              <terminal>if</terminal>
              <variable>expression</variable>
              <terminal>end of line</terminal>
              <terminal>open block</terminal>
              <repeat min="1"><variable>statement</variable></repeat>
              <terminal>close block</terminal>
            </rule>
            <rule>
              <error/>
              <terminal>end of line</terminal>
            </rule>
          </variable>

          <variable name="expression">
            <rule><terminal>identifier</terminal></rule>
            <rule><terminal>integer</terminal></rule>
          </variable>
        </grammar>
    "#;

    fn parse(grammar: &str, source: &str) -> (Parser, Option<ParseTree<KangToken>>) {
        let parser = Parser::build(kang_grammar::load(grammar).unwrap()).unwrap();

        let lexer = Lexer::new(source.chars(), BufLog::new());
        let mut tokenizer = Tokenizer::new(lexer);
        let tree = parser.parse(&mut tokenizer).unwrap();

        (parser, tree)
    }

    /// Renders a tree like "((a + (b × c)) + d)", with single-child
    /// variables flattened to their child.
    fn shape(node: &Node<KangToken>) -> String {
        match node {
            Node::Terminal { token } => token
                .lexeme()
                .unwrap_or_else(|| token.token_class())
                .to_string(),
            Node::Error { .. } => "<error>".to_string(),
            Node::Variable { children, .. } => {
                if children.len() == 1 {
                    shape(&children[0])
                } else {
                    let rendered: Vec<String> = children.iter().map(shape).collect();
                    format!("({})", rendered.join(" "))
                }
            }
        }
    }

    fn statement_nodes<'tree>(
        parser: &Parser,
        node: &'tree Node<KangToken>,
        found: &mut Vec<&'tree Node<KangToken>>,
    ) {
        if let Node::Variable { rule, children, .. } = node {
            let grammar = parser.grammar();
            if grammar.variable(grammar.rule(*rule).lhs()).name() == "statement" {
                found.push(node);
            }
            for child in children {
                statement_nodes(parser, child, found);
            }
        }
    }

    #[test]
    fn arithmetic_precedence_end_to_end() {
        let (_, tree) = parse(ARITHMETIC, "a + b × c + d\n");
        let tree = tree.unwrap();

        assert_eq!(shape(tree.root()), "((a + (b × c)) + d)");
        assert!(!tree.has_error());
    }

    #[test]
    fn statements_parse_and_collapse() {
        let (parser, tree) = parse(STATEMENTS, "x = 1\ny = 2\nz = 3\n");
        let tree = tree.unwrap();

        // The repeat auxiliary vanishes: statements sit directly under the
        // program node.
        assert_eq!(tree.root().children().len(), 3);

        let mut statements = Vec::new();
        statement_nodes(&parser, tree.root(), &mut statements);
        assert_eq!(statements.len(), 3);

        // "x", "=", and the expression; the line marker is discarded.
        assert_eq!(statements[0].children().len(), 3);
    }

    #[test]
    fn recovery_spans_a_single_statement() {
        let (parser, tree) = parse(STATEMENTS, "x = 1\ny =\nz = 3\n");
        let tree = tree.unwrap();

        let mut statements = Vec::new();
        statement_nodes(&parser, tree.root(), &mut statements);
        assert_eq!(statements.len(), 3);

        assert!(!statements[0].has_error());
        assert!(statements[1].has_error());
        assert!(!statements[2].has_error());
    }

    #[test]
    fn indentation_blocks_nest_statements() {
        let source = "x = 1\nif x\n  y = 2\n  z = 3\nw = 4\n";
        let (parser, tree) = parse(STATEMENTS, source);
        let tree = tree.unwrap();

        assert!(!tree.has_error());
        assert_eq!(tree.root().children().len(), 3);

        let if_statement = &tree.root().children()[1];
        match &if_statement.children()[0] {
            Node::Terminal { token } => assert_eq!(token.token_class(), "if"),
            other => panic!("expected the if keyword, got {:?}", other),
        }

        // The block's two statements collapse into the if statement, after
        // the keyword and the condition.
        let mut nested = Vec::new();
        statement_nodes(&parser, if_statement, &mut nested);
        assert_eq!(nested.len(), 3); // the if statement plus the two nested ones
    }

    #[test]
    fn transactions_replay_the_lexed_stream() {
        let source = "a + b × c\n";

        let straight: Vec<String> = {
            let mut lexer = Lexer::new(source.chars(), BufLog::new());
            let mut classes = Vec::new();
            while let Some(token) = kang_core::TokenSource::extract_token(&mut lexer) {
                classes.push(token.token_class().to_string());
            }
            classes
        };

        let mut tokenizer = Tokenizer::new(Lexer::new(source.chars(), BufLog::new()));
        tokenizer.begin_transaction();
        tokenizer.get_token();
        tokenizer.get_token();
        tokenizer.rollback_transaction();

        let mut replayed = Vec::new();
        while let Some(token) = tokenizer.get_token() {
            replayed.push(token.token_class().to_string());
        }

        assert_eq!(replayed, straight);
    }
}
