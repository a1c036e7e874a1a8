//! PDDL fixtures shared by tests across the crate.

pub const BLOCKSWORLD_DOMAIN: &str = r#"
(define (domain blocksworld)
    (:requirements :typing)
    (:types block)
    (:predicates
        (on ?x - block ?y - block)
        (clear ?x - block)
        (ontable ?x - block)
        (holding ?x - block)
        (handempty))

    (:action pickup
        :parameters (?x - block)
        :precondition (and (clear ?x) (ontable ?x) (handempty))
        :effect (and (holding ?x) (not (ontable ?x)) (not (clear ?x)) (not (handempty))))

    (:action putdown
        :parameters (?x - block)
        :precondition (holding ?x)
        :effect (and (ontable ?x) (clear ?x) (handempty) (not (holding ?x))))

    (:action stack
        :parameters (?x - block ?y - block)
        :precondition (and (holding ?x) (clear ?y))
        :effect (and (on ?x ?y) (clear ?x) (handempty) (not (holding ?x)) (not (clear ?y))))

    (:action unstack
        :parameters (?x - block ?y - block)
        :precondition (and (on ?x ?y) (clear ?x) (handempty))
        :effect (and (holding ?x) (clear ?y) (not (on ?x ?y)) (not (clear ?x)) (not (handempty))))
)"#;

pub const BLOCKSWORLD_PROBLEM: &str = r#"
(define (problem blocksworld-3)
    (:domain blocksworld)
    (:objects a b c - block)
    (:init (on a b) (ontable b) (ontable c) (clear a) (clear c) (handempty))
    (:goal (and (on a b) (on b c)))
)"#;

/// The single-swap domain: one action that moves the top of a tower.
pub const SWAP_DOMAIN: &str = r#"
(define (domain swap)
    (:types block)
    (:predicates (on ?x - block ?y - block))
    (:action move
        :parameters (?x - block ?y - block ?z - block)
        :precondition (on ?x ?y)
        :effect (and (on ?x ?z) (not (on ?x ?y))))
)"#;

pub const SWAP_PROBLEM: &str = r#"
(define (problem swap-1)
    (:domain swap)
    (:objects a b c - block)
    (:init (on a b))
    (:goal (on a c))
)"#;

/// Same domain, but the goal already holds in the initial state.
pub const SWAP_TRIVIAL_PROBLEM: &str = r#"
(define (problem swap-0)
    (:domain swap)
    (:objects a b c - block)
    (:init (on a b))
    (:goal (on a b))
)"#;

/// `(handempty)` is never affected by any action, so a goal requiring its
/// negation is rigidly refuted.
pub const RIGID_DOMAIN: &str = r#"
(define (domain rigid)
    (:predicates (handempty) (p ?x))
    (:action consume
        :parameters (?x)
        :precondition (p ?x)
        :effect (not (p ?x)))
)"#;

pub const RIGID_PROBLEM: &str = r#"
(define (problem rigid-1)
    (:domain rigid)
    (:objects o)
    (:init (handempty) (p o))
    (:goal (not (handempty)))
)"#;

/// A domain without actions; any goal not holding initially is unreachable.
pub const INERT_DOMAIN: &str = r#"
(define (domain inert)
    (:predicates (p ?x))
)"#;

pub const INERT_PROBLEM: &str = r#"
(define (problem inert-1)
    (:domain inert)
    (:objects o q)
    (:init (p o))
    (:goal (p q))
)"#;
