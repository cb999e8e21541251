use decl_scan::parser::scanner::scan_unit;
use decl_scan::{Access, EntityKind, FunctionEntity, ScanPipeline, SourceUnit};

// The canonical sample source: free functions, two stub records with a
// private method each, and a template identity function.
const SAMPLE_CPP: &str = r#"#include <cstdio>

int foo(int a, int b);
void bar();

class FooBar {
public:
    FooBar() = default;

private:
    void bazz();
};

struct BarFoo {
public:
    BarFoo() = default;

private:
    void bazz();
};

template <typename T>
T get_foo(T t) {
    return t;
}

// --------- DEFINITIONS --------- //

int foo(int a, int b) {
    printf("foo\n");
    return 0;
}

void bar() {
    printf("bar\n");
}

void FooBar::bazz() {
    printf("baz\n");
}

void BarFoo::bazz() {
    printf("baz\n");
}
"#;

// Variant that wraps two extra print functions in a namespace.
const NAMESPACE_BLOCK: &str = r#"
namespace deadbeef {

void beef();
void dead();

void beef() {
    printf("deadbeef::beef\n");
}

void dead() {
    printf("deadbeef::dead\n");
}

} // namespace deadbeef
"#;

/// 由行/欄換算 0-based byte offset，獨立驗證 lexer 的位置計算
fn offset_of(text: &str, line: u32, column: u32) -> usize {
    let mut offset = 0usize;
    for (idx, l) in text.split('\n').enumerate() {
        if idx as u32 + 1 == line {
            return offset + (column as usize - 1);
        }
        offset += l.len() + 1;
    }
    panic!("line {} out of range", line);
}

fn assert_entity(
    entity: &FunctionEntity,
    name: &str,
    qualified: &str,
    kind: EntityKind,
    is_definition: bool,
    line: u32,
    column: u32,
    text: &str,
) {
    assert_eq!(entity.name, name);
    assert_eq!(entity.qualified_name, qualified);
    assert_eq!(entity.kind, kind);
    assert_eq!(entity.is_definition, is_definition);
    assert_eq!(entity.location.line, line, "line of {}", qualified);
    assert_eq!(entity.location.column, column, "column of {}", qualified);
    assert_eq!(
        entity.location.offset,
        offset_of(text, line, column),
        "offset of {}",
        qualified
    );
}

#[test]
fn test_sample_source_inventory() {
    let entities = scan_unit("sample.cpp", SAMPLE_CPP);

    // 來源順序：宣告、類別方法、模板、定義、類外定義
    assert_eq!(entities.len(), 9);

    let text = SAMPLE_CPP;
    assert_entity(&entities[0], "foo", "foo", EntityKind::Function, false, 3, 5, text);
    assert_entity(&entities[1], "bar", "bar", EntityKind::Function, false, 4, 6, text);
    assert_entity(
        &entities[2],
        "bazz",
        "FooBar::bazz",
        EntityKind::Method,
        false,
        11,
        10,
        text,
    );
    assert_entity(
        &entities[3],
        "bazz",
        "BarFoo::bazz",
        EntityKind::Method,
        false,
        19,
        10,
        text,
    );
    assert_entity(
        &entities[4],
        "get_foo",
        "get_foo",
        EntityKind::FunctionTemplate,
        true,
        23,
        3,
        text,
    );
    assert_entity(&entities[5], "foo", "foo", EntityKind::Function, true, 29, 5, text);
    assert_entity(&entities[6], "bar", "bar", EntityKind::Function, true, 34, 6, text);
    assert_entity(
        &entities[7],
        "bazz",
        "FooBar::bazz",
        EntityKind::Method,
        true,
        38,
        14,
        text,
    );
    assert_entity(
        &entities[8],
        "bazz",
        "BarFoo::bazz",
        EntityKind::Method,
        true,
        42,
        14,
        text,
    );

    // 建構子不列入
    assert!(entities.iter().all(|e| e.name != "FooBar" && e.name != "BarFoo"));

    // 類別內宣告帶 private 存取層級，類外定義不帶
    assert_eq!(entities[2].access, Some(Access::Private));
    assert_eq!(entities[3].access, Some(Access::Private));
    assert_eq!(entities[7].access, None);
}

#[test]
fn test_namespace_variant_adds_qualified_functions() {
    let variant = format!("{}{}", SAMPLE_CPP, NAMESPACE_BLOCK);
    let entities = scan_unit("sample_ns.cpp", &variant);

    // 基本樣本的 9 個實體加上 beef/dead 的宣告與定義
    assert_eq!(entities.len(), 13);

    let beef: Vec<&FunctionEntity> = entities.iter().filter(|e| e.name == "beef").collect();
    let dead: Vec<&FunctionEntity> = entities.iter().filter(|e| e.name == "dead").collect();
    assert_eq!(beef.len(), 2);
    assert_eq!(dead.len(), 2);

    for entity in beef.iter().chain(dead.iter()) {
        assert_eq!(entity.kind, EntityKind::Function);
        assert_eq!(
            entity.qualified_name,
            format!("deadbeef::{}", entity.name)
        );
        // 回報的位置要落在包含該名稱的那一行
        let line_text = variant
            .split('\n')
            .nth(entity.location.line as usize - 1)
            .unwrap();
        assert!(line_text.contains(&entity.name));
    }

    assert!(!beef[0].is_definition);
    assert!(beef[1].is_definition);
}

#[test]
fn test_report_line_format() {
    let entities = scan_unit("sample.cpp", SAMPLE_CPP);
    let offset = offset_of(SAMPLE_CPP, 3, 5);
    assert_eq!(
        entities[0].report_line(),
        format!("function: foo @ sample.cpp:3:5:{}", offset)
    );
    // 文字報表一律用非限定名稱
    let bazz = entities.iter().find(|e| e.name == "bazz").unwrap();
    assert!(bazz.report_line().starts_with("function: bazz @ sample.cpp:"));
}

#[test]
fn test_scan_is_a_pure_function_of_input() {
    let first = scan_unit("sample.cpp", SAMPLE_CPP);
    let second = scan_unit("sample.cpp", SAMPLE_CPP);
    assert_eq!(first, second);
}

// 樣本素材在原始倉庫裡整份重複；掃描器不跨單元去重
#[tokio::test]
async fn test_duplicated_units_are_reported_twice() {
    use decl_scan::core::{ConfigProvider, Pipeline, Storage};
    use decl_scan::Result;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MemStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl Storage for MemStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            Ok(files.get(path).cloned().unwrap_or_default())
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct DupConfig {
        paths: Vec<String>,
        formats: Vec<String>,
    }

    impl ConfigProvider for DupConfig {
        fn source_paths(&self) -> &[String] {
            &self.paths
        }
        fn remote_endpoint(&self) -> Option<&str> {
            None
        }
        fn output_path(&self) -> &str {
            "out"
        }
        fn output_formats(&self) -> &[String] {
            &self.formats
        }
        fn name_filter(&self) -> Option<&str> {
            None
        }
        fn kind_filter(&self) -> &[String] {
            &[]
        }
        fn archive_name(&self) -> Option<&str> {
            None
        }
    }

    let storage = MemStorage {
        files: Arc::new(Mutex::new(HashMap::from([
            ("copy1.cpp".to_string(), SAMPLE_CPP.as_bytes().to_vec()),
            ("copy2.cpp".to_string(), SAMPLE_CPP.as_bytes().to_vec()),
        ]))),
    };
    let config = DupConfig {
        paths: vec!["copy1.cpp".to_string(), "copy2.cpp".to_string()],
        formats: vec!["text".to_string()],
    };
    let pipeline = ScanPipeline::new(storage, config);

    let units: Vec<SourceUnit> = pipeline.extract().await.unwrap();
    assert_eq!(units.len(), 2);

    let outcome = pipeline.transform(units).await.unwrap();
    assert_eq!(outcome.entities.len(), 18);

    // 兩輪收集：所有函式與模板在前（兩份各 5 個），方法在後
    for entity in &outcome.entities[..10] {
        assert_ne!(entity.kind, EntityKind::Method);
    }
    for entity in &outcome.entities[10..] {
        assert_eq!(entity.kind, EntityKind::Method);
    }
}
