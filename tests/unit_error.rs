/// Unit tests for DiError and DiResult types

use ferrous_ctor::{DiError, DiResult, ErrorKind};
use std::error::Error;

#[test]
fn test_error_display_no_constructors() {
    let error = DiError::NoConstructors("app::Other");
    let display_str = format!("{}", error);
    assert_eq!(display_str, "app::Other is not registered (no constructors available)");
    assert!(display_str.contains("app::Other"));
}

#[test]
fn test_error_display_not_assignable() {
    let error = DiError::NotAssignable {
        declared: "dyn app::IRepository",
        candidate: "app::Unrelated",
    };
    assert_eq!(
        error.to_string(),
        "dyn app::IRepository is not registered (not assignable from app::Unrelated)"
    );
}

#[test]
fn test_error_display_circular() {
    let path = vec!["ServiceA", "ServiceB", "ServiceA"];
    let error = DiError::Circular(path);
    let display_str = format!("{}", error);
    assert_eq!(display_str, "Circular dependency: ServiceA -> ServiceB -> ServiceA");
}

#[test]
fn test_error_display_circular_single() {
    let error = DiError::Circular(vec!["SelfRef", "SelfRef"]);
    assert_eq!(error.to_string(), "Circular dependency: SelfRef -> SelfRef");
}

#[test]
fn test_error_display_not_instantiated() {
    let error = DiError::NotInstantiated("app::Missing".to_string());
    assert_eq!(
        error.to_string(),
        "app::Missing is not instantiated (no constructors available)"
    );
}

#[test]
fn test_error_display_argument_count() {
    let error = DiError::ArgumentCount {
        key: "app::Repo(i32)".to_string(),
        expected: 1,
        actual: 3,
    };
    assert_eq!(error.to_string(), "app::Repo(i32) expects 1 arguments, got 3");
}

#[test]
fn test_error_display_type_mismatch() {
    let error = DiError::TypeMismatch {
        expected: "i32",
        actual: "object",
    };
    assert_eq!(error.to_string(), "Type mismatch: expected i32, got object");
}

#[test]
fn test_error_display_depth_exceeded() {
    let error = DiError::DepthExceeded(1024);
    assert_eq!(error.to_string(), "Max depth 1024 exceeded");
}

#[test]
fn test_error_kinds() {
    let registration = [
        DiError::NoConstructors("A"),
        DiError::NotAssignable { declared: "A", candidate: "B" },
        DiError::Circular(vec!["A", "A"]),
        DiError::DepthExceeded(1),
    ];
    for error in &registration {
        assert_eq!(error.kind(), ErrorKind::Registration, "{:?}", error);
        assert!(error.is_registration());
        assert!(!error.is_instantiation());
    }

    let instantiation = [
        DiError::NotInstantiated("A".to_string()),
        DiError::ArgumentCount { key: "A()".to_string(), expected: 0, actual: 1 },
        DiError::TypeMismatch { expected: "A", actual: "B" },
    ];
    for error in &instantiation {
        assert_eq!(error.kind(), ErrorKind::Instantiation, "{:?}", error);
        assert!(error.is_instantiation());
    }
}

#[test]
fn test_error_trait_and_clone() {
    let error = DiError::Circular(vec!["A", "B", "A"]);
    assert!(error.source().is_none());

    let boxed: Box<dyn Error> = Box::new(error.clone());
    assert_eq!(boxed.to_string(), error.to_string());
    assert_ne!(error, DiError::Circular(vec!["A", "A"]));
}

#[test]
fn test_di_result_question_mark() {
    fn inner() -> DiResult<u8> {
        Err(DiError::NoConstructors("Inner"))
    }

    fn outer() -> DiResult<u8> {
        let value = inner()?;
        Ok(value + 1)
    }

    assert_eq!(outer(), Err(DiError::NoConstructors("Inner")));
}
