//! Declaration scanner. Walks the token stream and records every
//! function-like declaration visible at namespace or class scope; bodies and
//! expressions are skipped, not parsed. Parenthesized variable initializers
//! that look like parameter lists are only filtered out heuristically.

use crate::domain::model::{Access, EntityKind, FunctionEntity, Location};
use crate::parser::lexer::{tokenize, Token, TokenKind};

/// Scan one source unit and return the entities in source order.
pub fn scan_unit(path: &str, text: &str) -> Vec<FunctionEntity> {
    let mut scanner = Scanner {
        tokens: tokenize(text),
        pos: 0,
        file: path,
        entities: Vec::new(),
    };
    let mut scope = Vec::new();
    scanner.scan_scope(&mut scope, false);
    scanner.entities
}

fn is_reserved_word(word: &str) -> bool {
    matches!(
        word,
        "void" | "int" | "char" | "bool" | "float" | "double" | "long" | "short"
            | "signed" | "unsigned" | "auto" | "const" | "volatile" | "constexpr"
            | "consteval" | "constinit" | "static" | "inline" | "extern" | "virtual"
            | "explicit" | "friend" | "register" | "mutable" | "typename" | "class"
            | "struct" | "enum" | "union" | "operator" | "return" | "if" | "else"
            | "while" | "for" | "do" | "switch" | "case" | "sizeof" | "alignof"
            | "alignas" | "decltype" | "new" | "delete" | "throw" | "noexcept"
            | "namespace" | "using" | "typedef" | "template" | "public" | "private"
            | "protected" | "static_assert" | "wchar_t" | "char8_t" | "char16_t"
            | "char32_t"
    )
}

fn location_of(token: &Token) -> Location {
    Location {
        line: token.line,
        column: token.column,
        offset: token.offset,
    }
}

fn qualify(scope: &[String], tail: &[String]) -> String {
    let mut parts: Vec<&str> = scope.iter().map(String::as_str).collect();
    parts.extend(tail.iter().map(String::as_str));
    parts.join("::")
}

struct Scanner<'a> {
    tokens: Vec<Token>,
    pos: usize,
    file: &'a str,
    entities: Vec<FunctionEntity>,
}

impl<'a> Scanner<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn kind_at(&self, n: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + n).map(|t| &t.kind)
    }

    fn ident_at(&self, n: usize) -> Option<&str> {
        match self.kind_at(n) {
            Some(TokenKind::Ident(word)) => Some(word.as_str()),
            _ => None,
        }
    }

    // ---- 平衡略過 ----

    fn skip_parens(&mut self) {
        let mut depth = 0usize;
        loop {
            let Some(kind) = self.peek_kind() else { return };
            match kind {
                TokenKind::LParen => {
                    depth += 1;
                    self.pos += 1;
                }
                TokenKind::RParen => {
                    depth = depth.saturating_sub(1);
                    self.pos += 1;
                    if depth == 0 {
                        return;
                    }
                }
                _ => {
                    self.pos += 1;
                }
            }
        }
    }

    fn skip_braces(&mut self) {
        let mut depth = 0usize;
        loop {
            let Some(kind) = self.peek_kind() else { return };
            match kind {
                TokenKind::LBrace => {
                    depth += 1;
                    self.pos += 1;
                }
                TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    self.pos += 1;
                    if depth == 0 {
                        return;
                    }
                }
                _ => {
                    self.pos += 1;
                }
            }
        }
    }

    fn skip_brackets(&mut self) {
        let mut depth = 0usize;
        loop {
            let Some(kind) = self.peek_kind() else { return };
            match kind {
                TokenKind::LBracket => {
                    depth += 1;
                    self.pos += 1;
                }
                TokenKind::RBracket => {
                    depth = depth.saturating_sub(1);
                    self.pos += 1;
                    if depth == 0 {
                        return;
                    }
                }
                _ => {
                    self.pos += 1;
                }
            }
        }
    }

    fn skip_angles(&mut self) {
        if !matches!(self.peek_kind(), Some(TokenKind::Less)) {
            return;
        }
        let mut depth = 0i32;
        loop {
            let Some(kind) = self.peek_kind() else { return };
            match kind {
                TokenKind::Less => {
                    depth += 1;
                    self.pos += 1;
                }
                TokenKind::Greater => {
                    depth -= 1;
                    self.pos += 1;
                    if depth <= 0 {
                        return;
                    }
                }
                // 模板引數不會含這些；當作失衡保險
                TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace => return,
                TokenKind::LParen => self.skip_parens(),
                _ => {
                    self.pos += 1;
                }
            }
        }
    }

    /// 消耗到分號為止（平衡括號），但不吞掉上層範圍的右大括號
    fn skip_to_semicolon(&mut self) {
        let mut depth = 0usize;
        loop {
            let Some(kind) = self.peek_kind() else { return };
            match kind {
                TokenKind::Semicolon if depth == 0 => {
                    self.pos += 1;
                    return;
                }
                TokenKind::LParen | TokenKind::LBrace | TokenKind::LBracket => {
                    depth += 1;
                    self.pos += 1;
                }
                TokenKind::RParen | TokenKind::RBracket => {
                    depth = depth.saturating_sub(1);
                    self.pos += 1;
                }
                TokenKind::RBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    self.pos += 1;
                }
                _ => {
                    self.pos += 1;
                }
            }
        }
    }

    /// 宣告尾端：`;` 結束宣告、`{}` 本體結束定義、`= default/delete/0` 視同宣告。
    /// 回傳是否為定義。
    fn skip_decl_tail(&mut self) -> bool {
        loop {
            let Some(kind) = self.peek_kind() else { return false };
            match kind {
                TokenKind::Semicolon => {
                    self.pos += 1;
                    return false;
                }
                TokenKind::LBrace => {
                    self.skip_braces();
                    if matches!(self.peek_kind(), Some(TokenKind::Semicolon)) {
                        self.pos += 1;
                    }
                    return true;
                }
                TokenKind::Equals => {
                    self.skip_to_semicolon();
                    return false;
                }
                TokenKind::RBrace => return false,
                TokenKind::LParen => self.skip_parens(),
                _ => {
                    self.pos += 1;
                }
            }
        }
    }

    // ---- 範圍掃描 ----

    fn scan_scope(&mut self, scope: &mut Vec<String>, terminate_on_rbrace: bool) {
        loop {
            let Some(kind) = self.peek_kind() else { return };
            match kind {
                TokenKind::RBrace => {
                    self.pos += 1;
                    if terminate_on_rbrace {
                        return;
                    }
                }
                TokenKind::Semicolon => {
                    self.pos += 1;
                }
                TokenKind::Ident(word) => match word.as_str() {
                    "namespace" => self.scan_namespace(scope),
                    "inline" if self.ident_at(1) == Some("namespace") => {
                        self.pos += 1;
                    }
                    "extern" if matches!(self.kind_at(1), Some(TokenKind::StringLit)) => {
                        self.pos += 2;
                        if matches!(self.peek_kind(), Some(TokenKind::LBrace)) {
                            self.pos += 1;
                            self.scan_scope(scope, true);
                        }
                    }
                    "template" => {
                        self.pos += 1;
                        self.skip_angles();
                        if matches!(self.ident_at(0), Some("class") | Some("struct")) {
                            self.scan_record(scope);
                        } else {
                            self.scan_declaration(scope, true);
                        }
                    }
                    "class" | "struct" => self.scan_record(scope),
                    "enum" | "union" | "using" | "typedef" | "static_assert" => {
                        self.pos += 1;
                        self.skip_to_semicolon();
                    }
                    _ => self.scan_declaration(scope, false),
                },
                _ => self.scan_declaration(scope, false),
            }
        }
    }

    fn scan_namespace(&mut self, scope: &mut Vec<String>) {
        self.pos += 1; // namespace
        let mut names: Vec<String> = Vec::new();
        if let Some(TokenKind::Ident(name)) = self.peek_kind() {
            names.push(name.clone());
            self.pos += 1;
            // C++17 巢狀寫法 namespace a::b
            while matches!(self.peek_kind(), Some(TokenKind::ColonColon)) {
                if let Some(TokenKind::Ident(next)) = self.kind_at(1) {
                    names.push(next.clone());
                    self.pos += 2;
                } else {
                    break;
                }
            }
        }
        match self.peek_kind() {
            Some(TokenKind::LBrace) => {
                self.pos += 1;
                let depth = scope.len();
                scope.extend(names);
                self.scan_scope(scope, true);
                scope.truncate(depth);
            }
            // namespace 別名或異常輸入
            _ => self.skip_to_semicolon(),
        }
    }

    fn scan_record(&mut self, scope: &mut Vec<String>) {
        let default_access = match self.ident_at(0) {
            Some("struct") => Access::Public,
            _ => Access::Private,
        };
        self.pos += 1; // class / struct

        let mut name: Option<String> = None;
        loop {
            let Some(kind) = self.peek_kind() else { return };
            match kind {
                TokenKind::Ident(word) => match word.as_str() {
                    "final" => {
                        self.pos += 1;
                    }
                    "alignas" => {
                        self.pos += 1;
                        if matches!(self.peek_kind(), Some(TokenKind::LParen)) {
                            self.skip_parens();
                        }
                    }
                    // 巨集修飾等情況取最後一個識別字當名稱
                    other => {
                        name = Some(other.to_string());
                        self.pos += 1;
                    }
                },
                TokenKind::LBracket => self.skip_brackets(),
                TokenKind::Less => self.skip_angles(),
                TokenKind::Colon => {
                    // 繼承列表掃到本體開頭
                    self.pos += 1;
                    loop {
                        match self.peek_kind() {
                            Some(TokenKind::LBrace) | None => break,
                            Some(TokenKind::Less) => self.skip_angles(),
                            Some(TokenKind::Semicolon) => {
                                self.pos += 1;
                                return;
                            }
                            Some(_) => {
                                self.pos += 1;
                            }
                        }
                    }
                }
                TokenKind::LBrace => {
                    self.pos += 1;
                    let record_name = name.unwrap_or_default();
                    let depth = scope.len();
                    if !record_name.is_empty() {
                        scope.push(record_name.clone());
                    }
                    self.scan_record_body(scope, &record_name, default_access);
                    scope.truncate(depth);
                    self.skip_to_semicolon();
                    return;
                }
                // 前向宣告
                TokenKind::Semicolon => {
                    self.pos += 1;
                    return;
                }
                _ => {
                    self.pos += 1;
                }
            }
        }
    }

    fn scan_record_body(
        &mut self,
        scope: &mut Vec<String>,
        record_name: &str,
        default_access: Access,
    ) {
        let mut access = default_access;
        loop {
            let Some(kind) = self.peek_kind() else { return };
            match kind {
                TokenKind::RBrace => {
                    self.pos += 1;
                    return;
                }
                TokenKind::Semicolon => {
                    self.pos += 1;
                }
                TokenKind::Ident(word) => match word.as_str() {
                    "public" | "protected" | "private"
                        if matches!(self.kind_at(1), Some(TokenKind::Colon)) =>
                    {
                        access = match word.as_str() {
                            "public" => Access::Public,
                            "protected" => Access::Protected,
                            _ => Access::Private,
                        };
                        self.pos += 2;
                    }
                    "class" | "struct" => self.scan_record(scope),
                    "enum" | "union" | "using" | "typedef" | "friend" | "static_assert" => {
                        self.pos += 1;
                        self.skip_to_semicolon();
                    }
                    "template" => {
                        self.pos += 1;
                        self.skip_angles();
                    }
                    _ => self.scan_member(scope, record_name, access),
                },
                _ => self.scan_member(scope, record_name, access),
            }
        }
    }

    fn scan_member(&mut self, scope: &[String], record_name: &str, access: Access) {
        let mut name: Option<(String, Location)> = None;
        let mut adjacent = false;
        let mut tilde_pending = false;
        let mut dtor = false;
        loop {
            let Some(token) = self.peek() else { return };
            match &token.kind {
                TokenKind::Ident(word) => {
                    name = Some((word.clone(), location_of(token)));
                    adjacent = true;
                    if tilde_pending {
                        dtor = true;
                        tilde_pending = false;
                    }
                    self.pos += 1;
                }
                TokenKind::ColonColon => {
                    self.pos += 1;
                }
                TokenKind::Tilde => {
                    tilde_pending = true;
                    adjacent = false;
                    self.pos += 1;
                }
                TokenKind::LParen => {
                    let name_ok = adjacent
                        && name
                            .as_ref()
                            .map(|(n, _)| !is_reserved_word(n))
                            .unwrap_or(false);
                    // 參數列以字面值開頭的視為變數初始化
                    let literal_args = matches!(
                        self.kind_at(1),
                        Some(TokenKind::Number(_))
                            | Some(TokenKind::StringLit)
                            | Some(TokenKind::CharLit)
                    );
                    self.skip_parens();
                    let is_definition = self.skip_decl_tail();

                    if !name_ok || literal_args || dtor {
                        return;
                    }
                    let (member_name, location) = name.unwrap();
                    if member_name == record_name {
                        return; // 建構子不列入
                    }
                    self.entities.push(FunctionEntity {
                        qualified_name: qualify(scope, std::slice::from_ref(&member_name)),
                        name: member_name,
                        kind: EntityKind::Method,
                        access: Some(access),
                        is_definition,
                        file: self.file.to_string(),
                        location,
                    });
                    return;
                }
                TokenKind::Semicolon => {
                    self.pos += 1;
                    return;
                }
                TokenKind::RBrace => return,
                TokenKind::LBrace => {
                    self.skip_braces();
                    adjacent = false;
                }
                TokenKind::Equals => {
                    self.skip_to_semicolon();
                    return;
                }
                TokenKind::Less => {
                    self.skip_angles();
                    adjacent = false;
                }
                TokenKind::LBracket => {
                    self.skip_brackets();
                    adjacent = false;
                }
                _ => {
                    adjacent = false;
                    self.pos += 1;
                }
            }
        }
    }

    fn scan_declaration(&mut self, scope: &[String], is_template: bool) {
        let mut chain: Vec<String> = Vec::new();
        let mut chain_loc: Option<Location> = None;
        let mut adjacent = false;
        let mut after_scope_op = false;
        let mut tilde_pending = false;
        let mut dtor = false;
        loop {
            let Some(token) = self.peek() else { return };
            match &token.kind {
                TokenKind::Ident(word) => {
                    if after_scope_op {
                        chain.push(word.clone());
                    } else {
                        chain.clear();
                        chain.push(word.clone());
                        dtor = false;
                    }
                    if tilde_pending {
                        dtor = true;
                        tilde_pending = false;
                    }
                    chain_loc = Some(location_of(token));
                    adjacent = true;
                    after_scope_op = false;
                    self.pos += 1;
                }
                TokenKind::ColonColon => {
                    after_scope_op = true;
                    adjacent = false;
                    self.pos += 1;
                }
                TokenKind::Tilde => {
                    tilde_pending = true;
                    adjacent = false;
                    self.pos += 1;
                }
                TokenKind::LParen => {
                    let name_ok = adjacent
                        && chain
                            .last()
                            .map(|n| !is_reserved_word(n))
                            .unwrap_or(false);
                    let literal_args = matches!(
                        self.kind_at(1),
                        Some(TokenKind::Number(_))
                            | Some(TokenKind::StringLit)
                            | Some(TokenKind::CharLit)
                    );
                    self.skip_parens();
                    if !name_ok || literal_args {
                        // 函式指標宣告子或變數初始化，繼續看後續 token
                        adjacent = false;
                        continue;
                    }
                    let is_ctor = chain.len() >= 2 && chain[chain.len() - 1] == chain[chain.len() - 2];
                    let is_definition = self.skip_decl_tail();
                    if dtor || is_ctor {
                        return;
                    }
                    let name = chain.last().cloned().unwrap_or_default();
                    let kind = if is_template {
                        EntityKind::FunctionTemplate
                    } else if chain.len() > 1 {
                        EntityKind::Method
                    } else {
                        EntityKind::Function
                    };
                    self.entities.push(FunctionEntity {
                        name,
                        qualified_name: qualify(scope, &chain),
                        kind,
                        access: None,
                        is_definition,
                        file: self.file.to_string(),
                        location: chain_loc.unwrap_or(Location {
                            line: 0,
                            column: 0,
                            offset: 0,
                        }),
                    });
                    return;
                }
                TokenKind::Semicolon => {
                    self.pos += 1;
                    return;
                }
                TokenKind::RBrace => return,
                TokenKind::LBrace => {
                    self.skip_braces();
                    adjacent = false;
                }
                TokenKind::Equals => {
                    self.skip_to_semicolon();
                    return;
                }
                TokenKind::Less => {
                    self.skip_angles();
                    adjacent = false;
                }
                TokenKind::LBracket => {
                    self.skip_brackets();
                    adjacent = false;
                }
                _ => {
                    adjacent = false;
                    self.pos += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> Vec<FunctionEntity> {
        scan_unit("test.cpp", text)
    }

    fn names(entities: &[FunctionEntity]) -> Vec<&str> {
        entities.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_free_function_declaration_and_definition() {
        let entities = scan("int foo(int a, int b);\nint foo(int a, int b) { return 0; }\n");
        assert_eq!(names(&entities), vec!["foo", "foo"]);
        assert!(!entities[0].is_definition);
        assert!(entities[1].is_definition);
        assert_eq!(entities[0].kind, EntityKind::Function);
        assert_eq!(entities[0].location.line, 1);
        assert_eq!(entities[0].location.column, 5);
        assert_eq!(entities[1].location.line, 2);
    }

    #[test]
    fn test_class_methods_and_access() {
        let entities = scan(
            "class Widget {\npublic:\n    Widget() = default;\n    void draw();\nprivate:\n    int size() const { return 0; }\n    ~Widget();\n};\n",
        );
        assert_eq!(names(&entities), vec!["draw", "size"]);
        assert_eq!(entities[0].access, Some(Access::Public));
        assert!(!entities[0].is_definition);
        assert_eq!(entities[1].access, Some(Access::Private));
        assert!(entities[1].is_definition);
        assert_eq!(entities[0].qualified_name, "Widget::draw");
    }

    #[test]
    fn test_struct_defaults_to_public() {
        let entities = scan("struct Point {\n    int norm();\n};\n");
        assert_eq!(entities[0].access, Some(Access::Public));
    }

    #[test]
    fn test_out_of_line_method_definition() {
        let entities = scan("void Widget::draw() {\n}\n");
        assert_eq!(names(&entities), vec!["draw"]);
        assert_eq!(entities[0].kind, EntityKind::Method);
        assert_eq!(entities[0].qualified_name, "Widget::draw");
        assert!(entities[0].is_definition);
        assert_eq!(entities[0].access, None);
    }

    #[test]
    fn test_out_of_line_ctor_and_dtor_are_skipped() {
        let entities = scan("Widget::Widget() : size_(0) {\n}\nWidget::~Widget() {\n}\n");
        assert!(entities.is_empty());
    }

    #[test]
    fn test_namespace_qualification() {
        let entities = scan("namespace deadbeef {\nvoid beef();\nvoid dead() {}\n}\n");
        assert_eq!(names(&entities), vec!["beef", "dead"]);
        assert_eq!(entities[0].qualified_name, "deadbeef::beef");
        assert_eq!(entities[1].qualified_name, "deadbeef::dead");
        assert!(entities[1].is_definition);
    }

    #[test]
    fn test_nested_namespace_shorthand() {
        let entities = scan("namespace a::b {\nvoid f();\n}\n");
        assert_eq!(entities[0].qualified_name, "a::b::f");
    }

    #[test]
    fn test_function_template() {
        let entities = scan("template <typename T>\nT get_foo(T t) {\n    return t;\n}\n");
        assert_eq!(names(&entities), vec!["get_foo"]);
        assert_eq!(entities[0].kind, EntityKind::FunctionTemplate);
        assert!(entities[0].is_definition);
    }

    #[test]
    fn test_class_template_methods_are_reported() {
        let entities = scan("template <typename T>\nclass Box {\npublic:\n    T value();\n};\n");
        assert_eq!(names(&entities), vec!["value"]);
        assert_eq!(entities[0].kind, EntityKind::Method);
        assert_eq!(entities[0].qualified_name, "Box::value");
    }

    #[test]
    fn test_forward_declaration_yields_nothing() {
        let entities = scan("class Widget;\nstruct Point;\n");
        assert!(entities.is_empty());
    }

    #[test]
    fn test_function_pointer_variable_is_not_reported() {
        let entities = scan("int (*handler)(int);\n");
        assert!(entities.is_empty());
    }

    #[test]
    fn test_parenthesized_initializer_is_not_reported() {
        let entities = scan("int x(42);\n");
        assert!(entities.is_empty());
    }

    #[test]
    fn test_pure_virtual_is_a_declaration() {
        let entities = scan("class Shape {\npublic:\n    virtual int area() = 0;\n};\n");
        assert_eq!(names(&entities), vec!["area"]);
        assert!(!entities[0].is_definition);
    }

    #[test]
    fn test_enum_using_typedef_are_skipped() {
        let entities =
            scan("enum Color { Red, Green };\nusing Fn = int;\ntypedef int (*Cb)(int);\nvoid go();\n");
        assert_eq!(names(&entities), vec!["go"]);
    }

    #[test]
    fn test_extern_c_block() {
        let entities = scan("extern \"C\" {\nint c_entry(void);\n}\nvoid after();\n");
        assert_eq!(names(&entities), vec!["c_entry", "after"]);
    }

    #[test]
    fn test_variables_are_not_reported() {
        let entities = scan("int counter = 0;\nstatic const char* tag = \"x\";\n");
        assert!(entities.is_empty());
    }

    #[test]
    fn test_scan_is_deterministic() {
        let text = "namespace n {\nclass C {\n    void m();\n};\nvoid f() {}\n}\n";
        assert_eq!(scan(text), scan(text));
    }
}
