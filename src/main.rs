use nightmeadow::flow::{run, FlowConstructor};
use nightmeadow::vignette::Vignette;

fn main() -> anyhow::Result<()> {
    let constructor: FlowConstructor<Vignette> = Box::new(|init| {
        Box::pin(async move {
            let vignette = Vignette::new(init).await?;
            Ok(vignette)
        })
    });
    run(constructor)
}
