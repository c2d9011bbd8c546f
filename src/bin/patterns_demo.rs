//==============================================================================
// Design Patterns - walkthrough of all 23 patterns
//==============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use colored::Colorize;
use course_lab::logging::{init_logger, verbose_from_args};
use course_lab::patterns::behavioral::{
    chain_of_responsibility as chain, command, iterator, mediator, memento, observer, state,
    strategy, template_method, visitor,
};
use course_lab::patterns::creational::{abstract_factory, builder, factory_method, prototype, singleton};
use course_lab::patterns::structural::{adapter, bridge, composite, decorator, facade, flyweight, proxy};
use course_lab::CourseConfig;

fn section(title: &str) {
    println!("\n{}", format!("=== {title} ===").bold().cyan());
}

fn creational() {
    section("Singleton");
    let registry = singleton::Singleton::instance();
    registry.set("course", "patterns");
    registry.set("lessons", 23);
    println!("{registry}");
    println!("initializations: {}", singleton::Singleton::initializations());

    section("Factory Method");
    let client = factory_method::Client;
    for kind in ["A", "B"] {
        if let Some(creator) = factory_method::new_creator(kind) {
            println!("{}", client.use_creator(creator.as_ref(), "widget"));
        }
    }

    section("Abstract Factory");
    for kind in ["1", "2"] {
        if let Some(factory) = abstract_factory::new_factory(kind) {
            let (a, b) = abstract_factory::Client.create_products(factory.as_ref());
            println!("{a} | {b}");
        }
    }

    section("Builder");
    let mut director = builder::Director::new(Box::new(builder::ConcreteBuilder1::new()));
    let product = director.construct();
    println!("{} / {} / {}", product.part_a(), product.part_b(), product.part_c());
    director.set_builder(Box::new(builder::ConcreteBuilder2::new()));
    let product = director.construct();
    println!("{} / {} / {}", product.part_a(), product.part_b(), product.part_c());

    section("Prototype");
    let mut original = prototype::ConcretePrototype1::new("config");
    original.set_data("env", "prod");
    let mut registry = prototype::PrototypeRegistry::new();
    registry.add_prototype("config", Box::new(original));
    if let Some(copy) = registry.get_prototype("config") {
        println!("{}", copy.info());
    }
}

fn structural() {
    section("Adapter");
    let adaptee = adapter::Adaptee::new("legacy call");
    println!("{}", adapter::Client.use_target(&adapter::Adapter::new(&adaptee)));
    println!("{}", adapter::Client.use_target(&adapter::ObjectAdapter::new("object call")));

    section("Bridge");
    let refined = bridge::RefinedAbstraction::new(Box::new(bridge::ConcreteImplementorA));
    let extended = bridge::ExtendedAbstraction::new(Box::new(bridge::ConcreteImplementorB));
    println!("{}", bridge::Client.use_abstraction(&refined));
    println!("{}", bridge::Client.use_abstraction(&extended));

    section("Composite");
    use composite::Component as _;
    let mut branch = composite::Composite::new("branch");
    branch.add(Box::new(composite::Leaf::new("leaf-1")));
    branch.add(Box::new(composite::Leaf::new("leaf-2")));
    let mut root = composite::Composite::new("root");
    root.add(Box::new(branch));
    root.add(Box::new(composite::Leaf::new("leaf-3")));
    println!("{}", root.operation());

    section("Decorator");
    use decorator::Component as _;
    let base = Box::new(decorator::ConcreteComponent::new("coffee"));
    let with_milk = Box::new(decorator::ConcreteDecoratorA::new(base, "milk"));
    let loud = decorator::ConcreteDecoratorB::new(with_milk, |s: String| s.to_uppercase());
    println!("{}", loud.operation());

    section("Facade");
    let client = facade::Client::new(facade::Facade::new("orders"));
    println!("{}", client.use_facade());

    section("Flyweight");
    let factory = Arc::new(flyweight::FlyweightFactory::new());
    let client = flyweight::Client::new(Arc::clone(&factory));
    for (key, position) in [("tree", "(1,2)"), ("tree", "(5,8)"), ("rock", "(3,3)")] {
        println!("{}", client.use_flyweight(key, position));
    }
    println!("shared flyweights: {}", factory.count());

    section("Proxy");
    let lazy = proxy::Client::new(Box::new(proxy::Proxy::new("report")));
    println!("{}", lazy.use_subject());
    let cached = proxy::Client::new(Box::new(proxy::CachingProxy::new(
        proxy::RealSubject::new("prices"),
        Duration::from_secs(60),
    )));
    println!("{}", cached.use_subject());
    let guarded = proxy::Client::new(Box::new(proxy::ProtectionProxy::new(
        proxy::RealSubject::new("payroll"),
        "guest",
    )));
    println!("{}", guarded.use_subject());
}

fn behavioral() {
    section("Chain of Responsibility");
    let handlers: Vec<Box<dyn chain::Handler>> = vec![
        Box::new(chain::ConcreteHandlerA::new()),
        Box::new(chain::ConcreteHandlerB::new()),
        Box::new(chain::ConcreteHandlerC::new()),
    ];
    if let Some(head) = chain::build_chain(handlers) {
        let client = chain::Client::new(head);
        for request in ["A", "C", "Z"] {
            let answer = client.send_request(request);
            println!("{request}: {}", if answer.is_empty() { "unhandled" } else { answer.as_str() });
        }
    }

    section("Command");
    let mut client = command::Client::new();
    println!("{}", client.run_command("save"));
    println!("{}", client.undo_last_command());
    println!("receiver state: {}", client.receiver_state());

    section("Iterator");
    let mut client = iterator::Client::new();
    client.add_items(["a", "b", "c"]);
    println!("{:?}", client.iterate());

    section("Mediator");
    let mut client = mediator::Client::new();
    client.add_colleague(Box::new(mediator::ConcreteColleagueA::new("alice")));
    client.add_colleague(Box::new(mediator::ConcreteColleagueB::new("bob")));
    for reply in client.send_message("alice", "standup in 5") {
        println!("{reply}");
    }

    section("Memento");
    let mut client = memento::Client::new("draft");
    client.save_state();
    client.set_state("final");
    client.restore_state(0);
    println!("restored: {}", client.current_state());

    section("Observer");
    let mut client = observer::Client::new();
    let first: observer::SharedObserver = Rc::new(RefCell::new(observer::ConcreteObserverA::new()));
    client.add_observer(first);
    client.add_observer(Rc::new(RefCell::new(observer::ConcreteObserverB::new())));
    client.set_state("published");
    println!("{} / {}", client.get_observer_state(0), client.get_observer_state(1));

    section("State");
    let mut client = state::Client::new(Box::new(state::ConcreteStateA));
    for _ in 0..2 {
        println!("{} -> now {}", client.make_request(), client.get_current_state());
    }

    section("Strategy");
    let mut client = strategy::Client::new(Box::new(strategy::ConcreteStrategyA));
    println!("{}", client.execute_strategy("data"));
    client.change_strategy(Box::new(strategy::ConcreteStrategyB));
    println!("{}", client.execute_strategy("data"));

    section("Template Method");
    println!("{}", template_method::Client::new(&template_method::ConcreteClassA).execute_algorithm());
    println!("{}", template_method::Client::new(&template_method::ConcreteClassB).execute_algorithm());

    section("Visitor");
    let mut client = visitor::Client::new();
    client.add_element(Box::new(visitor::ConcreteElementA::new("invoice")));
    client.add_element(Box::new(visitor::ConcreteElementB::new("receipt")));
    for line in client.execute_visitor(&visitor::ConcreteVisitor1) {
        println!("{line}");
    }
}

fn main() -> anyhow::Result<()> {
    init_logger(verbose_from_args());
    let _config = CourseConfig::load_validated().context("loading configuration")?;

    println!("{}", "Design Patterns".bold().green());
    creational();
    structural();
    behavioral();
    Ok(())
}
